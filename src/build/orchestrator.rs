//! Build pipeline driver
//!
//! [`BuildOrchestrator`] owns everything one build needs: the builder
//! provider, the native engine, the settings store, the processors and the
//! log sink. A run is linear and stops at the first failure; nothing is
//! retried or rolled back.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use super::configure::{apply_common_settings, configure};
use super::log::BuildLog;
use super::native::NativePlayerBuild;
use super::platforms::BuilderProvider;
use super::processors::ProcessorRegistry;
use super::settings::SettingsStore;
use super::{BuildConfiguration, BuildReport};
use crate::args::names::common;
use crate::args::schema::pad_left_lines;
use crate::args::ArgumentBag;
use crate::utils::terminal::ConsoleLog;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configuration,
    PreBuild,
    BeforeBuild,
    Build,
    AfterBuild,
    PostBuild,
    Finalize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Configuration => "OnConfiguration",
            Stage::PreBuild => "PreBuild",
            Stage::BeforeBuild => "OnBeforeBuild",
            Stage::Build => "Build",
            Stage::AfterBuild => "OnAfterBuild",
            Stage::PostBuild => "PostBuild",
            Stage::Finalize => "OnFinalize",
        };
        write!(f, "{}", name)
    }
}

/// Runs one player build from arguments to report
pub struct BuildOrchestrator<S: SettingsStore> {
    provider: Box<dyn BuilderProvider>,
    engine: Box<dyn NativePlayerBuild>,
    settings: S,
    processors: ProcessorRegistry,
    log: Box<dyn BuildLog>,
    scenes: Vec<String>,
    additional_help: Option<String>,
}

impl<S: SettingsStore> BuildOrchestrator<S> {
    pub fn new(
        provider: Box<dyn BuilderProvider>,
        engine: Box<dyn NativePlayerBuild>,
        settings: S,
    ) -> Self {
        Self {
            provider,
            engine,
            settings,
            processors: ProcessorRegistry::new(),
            log: Box::new(ConsoleLog),
            scenes: Vec::new(),
            additional_help: None,
        }
    }

    pub fn with_processors(mut self, processors: ProcessorRegistry) -> Self {
        self.processors = processors;
        self
    }

    pub fn with_log(mut self, log: Box<dyn BuildLog>) -> Self {
        self.log = log;
        self
    }

    /// Scenes included in the player, in build order
    pub fn with_scenes(mut self, scenes: Vec<String>) -> Self {
        self.scenes = scenes;
        self
    }

    /// Free text shown under the `AdditionalInfo:` heading in the help
    pub fn with_additional_help(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.additional_help = (!text.trim().is_empty()).then_some(text);
        self
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    /// Full help: common arguments, every available platform, additional
    /// info, then every processor that documents itself
    pub fn help(&self) -> String {
        let mut out = String::from("command line args:\n");
        out.push_str(&common::SCHEMA.describe(4));

        for target in self.provider.available_targets() {
            if let Ok(builder) = self.provider.get(target) {
                out.push_str(&pad_left_lines(&builder.help(), 8));
                out.push('\n');
            }
        }

        if let Some(text) = &self.additional_help {
            out.push_str("\n    AdditionalInfo:\n");
            out.push_str(&pad_left_lines(text, 8));
            out.push('\n');
        }

        for processor in self.processors.processors() {
            let help = processor.help();
            if help.trim().is_empty() {
                continue;
            }
            out.push_str(&format!("    {}\n", processor.name()));
            out.push_str(&pad_left_lines(&help, 8));
            out.push('\n');
        }

        out
    }

    /// Resolve the configuration, write the common settings and run the
    /// pipeline
    pub fn build_from_args(&mut self, args: Arc<ArgumentBag>) -> Result<BuildReport> {
        let verbose = args.is_verbose();
        if verbose {
            self.log.log(&self.help());
            self.log
                .log(&format!("Arguments:\n{}", args.format("\t{name}={value};\n")));
        }

        let config = configure(args, &self.scenes, &self.settings)?;

        if verbose {
            self.log.log(&format!("Version: {}", config.version()));
            self.log.log(&format!("Defines: {}", config.defines()));
        }

        apply_common_settings(&config, &mut self.settings);
        self.run(&config)
    }

    /// Run every stage for an already resolved configuration
    pub fn run(&mut self, config: &BuildConfiguration) -> Result<BuildReport> {
        let builder = self.provider.get(config.target())?;
        let log = self.log.as_ref();
        let verbose = config.is_verbose();
        let stage = |stage: Stage| {
            if verbose {
                log.log(&format!("[{}] {}", builder.display_name(), stage));
            }
        };

        stage(Stage::Configuration);
        self.processors
            .on_configuration(config, &mut self.settings, log)?;

        stage(Stage::PreBuild);
        builder.pre_build(config, &mut self.settings, log)?;

        stage(Stage::BeforeBuild);
        self.processors
            .on_before_build(config, &mut self.settings, log)?;

        stage(Stage::Build);
        let report = builder.build(config, self.engine.as_ref(), &self.settings, log)?;

        stage(Stage::AfterBuild);
        self.processors.on_after_build(config, &report, log)?;

        stage(Stage::PostBuild);
        builder.post_build(&report, config, log)?;

        stage(Stage::Finalize);
        self.processors.on_finalize(config, &report, log)?;

        if verbose {
            log.log(&format!("Build {}: {}", report.outcome, report.summary));
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::defines::RELEASE;
    use crate::build::log::MemoryLog;
    use crate::build::native::DryRunEngine;
    use crate::build::platforms::PlatformBuilders;
    use crate::build::processors::BuilderProcessor;
    use crate::build::settings::{keys, MemorySettings, SettingValue};
    use crate::build::{
        BuildOutcome, BuildTarget, PlatformBuilder, PlayerBuildOptions, TargetGroup,
    };
    use crate::error::BuildError;
    use std::time::Duration;

    trait BuildTokens {
        fn build_tokens<I, T>(&mut self, tokens: I) -> Result<BuildReport>
        where
            I: IntoIterator<Item = T>,
            T: AsRef<str>;
    }

    impl BuildTokens for BuildOrchestrator<MemorySettings> {
        fn build_tokens<I, T>(&mut self, tokens: I) -> Result<BuildReport>
        where
            I: IntoIterator<Item = T>,
            T: AsRef<str>,
        {
            let args = ArgumentBag::parse(tokens)?;
            self.build_from_args(Arc::new(args))
        }
    }

    struct RecordingEngine {
        log: MemoryLog,
    }

    impl NativePlayerBuild for RecordingEngine {
        fn build_player(
            &self,
            options: &PlayerBuildOptions,
            _settings: &dyn SettingsStore,
            _log: &dyn BuildLog,
        ) -> Result<BuildReport> {
            self.log.log("native");
            Ok(BuildReport {
                outcome: BuildOutcome::Succeeded,
                summary: "built".to_string(),
                output_path: options.location.clone(),
                duration: Duration::ZERO,
            })
        }
    }

    struct RecordingBuilder;

    impl PlatformBuilder for RecordingBuilder {
        fn display_name(&self) -> &str {
            "Recording"
        }

        fn pre_build(
            &self,
            _config: &BuildConfiguration,
            _settings: &mut dyn SettingsStore,
            log: &dyn BuildLog,
        ) -> Result<()> {
            log.log("PreBuild");
            Ok(())
        }

        fn build(
            &self,
            config: &BuildConfiguration,
            engine: &dyn NativePlayerBuild,
            settings: &dyn SettingsStore,
            log: &dyn BuildLog,
        ) -> Result<BuildReport> {
            log.log("Build");
            engine.build_player(config.options(), settings, log)
        }

        fn post_build(
            &self,
            report: &BuildReport,
            _config: &BuildConfiguration,
            log: &dyn BuildLog,
        ) -> Result<()> {
            log.log(&format!("PostBuild {}", report.outcome));
            Ok(())
        }
    }

    struct RecordingProcessor {
        name: &'static str,
        fail_before_build: bool,
    }

    impl RecordingProcessor {
        fn boxed(name: &'static str) -> Box<dyn BuilderProcessor> {
            Box::new(Self {
                name,
                fail_before_build: false,
            })
        }
    }

    impl BuilderProcessor for RecordingProcessor {
        fn name(&self) -> &str {
            self.name
        }

        fn help(&self) -> String {
            format!("{} help", self.name)
        }

        fn on_configuration(
            &self,
            _config: &BuildConfiguration,
            _settings: &mut dyn SettingsStore,
            log: &dyn BuildLog,
        ) -> Result<()> {
            log.log(&format!("{}.OnConfiguration", self.name));
            Ok(())
        }

        fn on_before_build(
            &self,
            _config: &BuildConfiguration,
            _settings: &mut dyn SettingsStore,
            log: &dyn BuildLog,
        ) -> Result<()> {
            log.log(&format!("{}.OnBeforeBuild", self.name));
            if self.fail_before_build {
                anyhow::bail!("{} refused to build", self.name);
            }
            Ok(())
        }

        fn on_after_build(
            &self,
            _config: &BuildConfiguration,
            _report: &BuildReport,
            log: &dyn BuildLog,
        ) -> Result<()> {
            log.log(&format!("{}.OnAfterBuild", self.name));
            Ok(())
        }

        fn on_finalize(
            &self,
            _config: &BuildConfiguration,
            _report: &BuildReport,
            log: &dyn BuildLog,
        ) -> Result<()> {
            log.log(&format!("{}.OnFinalize", self.name));
            Ok(())
        }
    }

    fn orchestrator(
        log: &MemoryLog,
        processors: ProcessorRegistry,
    ) -> BuildOrchestrator<MemorySettings> {
        let mut provider = PlatformBuilders::with_defaults();
        provider.insert(BuildTarget::Windows, Box::new(RecordingBuilder));
        provider.insert(BuildTarget::Android, Box::new(RecordingBuilder));

        BuildOrchestrator::new(
            Box::new(provider),
            Box::new(RecordingEngine { log: log.clone() }),
            MemorySettings::new(),
        )
        .with_processors(processors)
        .with_log(Box::new(log.clone()))
    }

    const WINDOWS_BUILD: [&str; 4] = [
        "buildTarget=Windows",
        "buildVersion=1.0.0",
        "buildNumber=7",
        "out=./out",
    ];

    #[test]
    fn test_pipeline_runs_every_stage_once_in_order() {
        let log = MemoryLog::new();
        let mut registry = ProcessorRegistry::new();
        registry.register(RecordingProcessor::boxed("P"));

        let mut orchestrator = orchestrator(&log, registry);
        let report = orchestrator.build_tokens(WINDOWS_BUILD).unwrap();

        assert_eq!(report.outcome, BuildOutcome::Succeeded);
        assert_eq!(
            log.lines(),
            vec![
                "P.OnConfiguration",
                "PreBuild",
                "P.OnBeforeBuild",
                "Build",
                "native",
                "P.OnAfterBuild",
                "PostBuild Succeeded",
                "P.OnFinalize",
            ]
        );

        let settings = orchestrator.settings();
        assert_eq!(
            settings.get(keys::BUNDLE_VERSION),
            Some(SettingValue::Text("1.0.7".into()))
        );
        assert_eq!(
            settings.get(&keys::scripting_defines(TargetGroup::Standalone)),
            Some(SettingValue::Text(RELEASE.into()))
        );
    }

    #[test]
    fn test_android_processor_skipped_on_windows() {
        let log = MemoryLog::new();
        let mut registry = ProcessorRegistry::new();
        registry.register_for(RecordingProcessor::boxed("Droid"), [BuildTarget::Android]);

        orchestrator(&log, registry)
            .build_tokens(WINDOWS_BUILD)
            .unwrap();
        assert!(log.lines().iter().all(|l| !l.starts_with("Droid")));
    }

    #[test]
    fn test_processor_failure_aborts_before_native_build() {
        let log = MemoryLog::new();
        let mut registry = ProcessorRegistry::new();
        registry.register(Box::new(RecordingProcessor {
            name: "Gate",
            fail_before_build: true,
        }));
        registry.register(RecordingProcessor::boxed("Later"));

        let err = orchestrator(&log, registry)
            .build_tokens(WINDOWS_BUILD)
            .unwrap_err();
        assert_eq!(err.to_string(), "Gate refused to build");
        assert_eq!(
            log.lines(),
            vec![
                "Gate.OnConfiguration",
                "Later.OnConfiguration",
                "PreBuild",
                "Gate.OnBeforeBuild",
            ]
        );
    }

    #[test]
    fn test_unsupported_target_fails_before_any_stage() {
        let log = MemoryLog::new();
        let mut orchestrator = BuildOrchestrator::new(
            Box::new(PlatformBuilders::only([BuildTarget::Android])),
            Box::new(DryRunEngine),
            MemorySettings::new(),
        )
        .with_log(Box::new(log.clone()));

        let err = orchestrator.build_tokens(WINDOWS_BUILD).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::UnsupportedBuildTarget { target }) if target == "Windows"
        ));
        assert!(log.lines().is_empty());
    }

    #[test]
    fn test_malformed_token_fails() {
        let log = MemoryLog::new();
        let err = orchestrator(&log, ProcessorRegistry::new())
            .build_tokens(["buildTarget=Windows", "=oops"])
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::MalformedArgument { token }) if token == "=oops"
        ));
    }

    #[test]
    fn test_verbose_logs_help_arguments_and_outcome() {
        let log = MemoryLog::new();
        let mut tokens = WINDOWS_BUILD.to_vec();
        tokens.push("verbose");

        orchestrator(&log, ProcessorRegistry::new())
            .build_tokens(tokens)
            .unwrap();

        let contents = log.contents();
        assert!(contents.starts_with("command line args:"));
        assert!(contents.contains("\tbuildTarget=Windows;\n"));
        assert!(contents.contains("Version: 1.0.7"));
        assert!(contents.contains("Defines: RELEASE"));
        assert!(contents.contains("[Recording] PreBuild"));
        assert!(contents.ends_with("Build Succeeded: built"));
    }

    #[test]
    fn test_help_layout() {
        let log = MemoryLog::new();
        let mut registry = ProcessorRegistry::new();
        registry.register(RecordingProcessor::boxed("Stamp"));
        let orchestrator = BuildOrchestrator::new(
            Box::new(PlatformBuilders::with_defaults()),
            Box::new(DryRunEngine),
            MemorySettings::new(),
        )
        .with_processors(registry)
        .with_log(Box::new(log))
        .with_additional_help("Ask the build team");

        let help = orchestrator.help();
        let lines: Vec<&str> = help.lines().collect();
        assert_eq!(lines[0], "command line args:");
        assert!(lines[1].starts_with("    buildTarget [required]"));
        assert!(lines.contains(&"        Windows64"));
        assert!(lines.contains(&"        Android"));
        assert!(lines.contains(&"        WebGL"));

        let info = lines.iter().position(|l| *l == "    AdditionalInfo:").unwrap();
        assert_eq!(lines[info - 1], "");
        assert_eq!(lines[info + 1], "        Ask the build team");
        assert_eq!(lines[info + 2], "    Stamp");
        assert_eq!(lines[info + 3], "        Stamp help");
    }
}
