//! Recognized argument names, grouped by the component that consumes them

use super::schema::{ArgumentDescriptor, ArgumentSchema};

/// Arguments read by the pipeline itself, for every platform
pub mod common {
    use super::*;

    pub const BUILD_TARGET: &str = "buildTarget";
    pub const BUILD_VERSION: &str = "buildVersion";
    pub const BUILD_NUMBER: &str = "buildNumber";
    pub const OUT: &str = "out";
    pub const DEBUG: &str = "debug";
    pub const EMBED_BUNDLES: &str = "embedBundles";
    pub const VERBOSE: &str = "verbose";
    pub const HELP: &str = "help";
    pub const SCRIPTING_BACKEND: &str = "scriptingBackend";
    pub const SHOW_SPLASH: &str = "showSplash";
    pub const ADD_DEFINES: &str = "addDefines";
    pub const REMOVE_DEFINES: &str = "removeDefines";

    pub const SCHEMA: ArgumentSchema = ArgumentSchema::new(&[
        ArgumentDescriptor::required(
            BUILD_TARGET,
            "target platform: Windows, Windows64, OSX, Linux64, Android, iOS, WebGL",
        ),
        ArgumentDescriptor::required(
            BUILD_VERSION,
            "bundle version major.minor[.patch]; the patch is replaced by buildNumber",
        ),
        ArgumentDescriptor::required(BUILD_NUMBER, "integer build number"),
        ArgumentDescriptor::required(OUT, "output location of the built player"),
        ArgumentDescriptor::optional(DEBUG, "development build with the DEBUG define"),
        ArgumentDescriptor::optional(EMBED_BUNDLES, "embed asset bundles into the player"),
        ArgumentDescriptor::optional(VERBOSE, "log help, arguments and the build result"),
        ArgumentDescriptor::optional(HELP, "print this help and exit"),
        ArgumentDescriptor::optional(SCRIPTING_BACKEND, "Mono2x or IL2CPP"),
        ArgumentDescriptor::optional(SHOW_SPLASH, "true/false, show the engine splash screen"),
        ArgumentDescriptor::optional(ADD_DEFINES, "';'-separated defines to add"),
        ArgumentDescriptor::optional(REMOVE_DEFINES, "';'-separated defines to remove"),
    ]);
}

/// Arguments for desktop standalone players
pub mod standalone {
    use super::*;

    pub const FULL_SCREEN_MODE: &str = "fullScreenMode";
    pub const DEFAULT_SCREEN_WIDTH: &str = "defaultScreenWidth";
    pub const DEFAULT_SCREEN_HEIGHT: &str = "defaultScreenHeight";

    pub const SCHEMA: ArgumentSchema = ArgumentSchema::new(&[
        ArgumentDescriptor::optional(
            FULL_SCREEN_MODE,
            "ExclusiveFullScreen, FullScreenWindow, MaximizedWindow or Windowed",
        ),
        ArgumentDescriptor::optional(DEFAULT_SCREEN_WIDTH, "default window width in pixels"),
        ArgumentDescriptor::optional(DEFAULT_SCREEN_HEIGHT, "default window height in pixels"),
    ]);
}

/// Arguments for Android players
pub mod android {
    use super::*;

    pub const USE_CUSTOM_KEYSTORE: &str = "useCustomKeystore";
    pub const KEYSTORE_NAME: &str = "keystoreName";
    pub const KEYSTORE_PASS: &str = "keystorePass";
    pub const KEYALIAS_NAME: &str = "keyaliasName";
    pub const KEYALIAS_PASS: &str = "keyaliasPass";
    pub const PREFERRED_INSTALL_LOCATION: &str = "preferredInstallLocation";
    pub const BUILD_SUBTARGET: &str = "androidBuildSubtarget";
    pub const BLIT_TYPE: &str = "blitType";
    pub const TARGET_SDK_VERSION: &str = "targetSdkVersion";
    pub const MIN_SDK_VERSION: &str = "minSdkVersion";
    pub const MAX_ASPECT_RATIO: &str = "maxAspectRatio";
    pub const TARGET_ARCHITECTURES: &str = "targetArchitectures";
    pub const BUILD_APK_PER_CPU_ARCHITECTURE: &str = "buildApkPerCpuArchitecture";
    pub const DISABLE_DEPTH_AND_STENCIL_BUFFERS: &str = "disableDepthAndStencilBuffers";
    pub const FORCE_SD_CARD_PERMISSION: &str = "forceSDCardPermission";
    pub const FORCE_INTERNET_PERMISSION: &str = "forceInternetPermission";
    pub const IS_GAME: &str = "androidIsGame";
    pub const USE_APK_EXPANSION_FILES: &str = "useAPKExpansionFiles";

    pub const SCHEMA: ArgumentSchema = ArgumentSchema::new(&[
        ArgumentDescriptor::optional(
            USE_CUSTOM_KEYSTORE,
            "true to sign with the keystore below (all four become required)",
        ),
        ArgumentDescriptor::optional(KEYSTORE_NAME, "path to the keystore"),
        ArgumentDescriptor::optional(KEYSTORE_PASS, "keystore password"),
        ArgumentDescriptor::optional(KEYALIAS_NAME, "key alias"),
        ArgumentDescriptor::optional(KEYALIAS_PASS, "key alias password"),
        ArgumentDescriptor::optional(
            PREFERRED_INSTALL_LOCATION,
            "Auto, PreferExternal or ForceInternal",
        ),
        ArgumentDescriptor::optional(BUILD_SUBTARGET, "Generic, DXT, PVRTC, ETC, ETC2 or ASTC"),
        ArgumentDescriptor::optional(BLIT_TYPE, "Always, Never or Auto"),
        ArgumentDescriptor::optional(
            TARGET_SDK_VERSION,
            "AndroidApiLevelAuto or AndroidApiLevel22..AndroidApiLevel34",
        ),
        ArgumentDescriptor::optional(MIN_SDK_VERSION, "AndroidApiLevel22..AndroidApiLevel34"),
        ArgumentDescriptor::optional(MAX_ASPECT_RATIO, "float, e.g. 2.1"),
        ArgumentDescriptor::optional(
            TARGET_ARCHITECTURES,
            "'|'-separated ARMv7, ARM64, X86, X86_64 (default ARMv7|ARM64)",
        ),
        ArgumentDescriptor::optional(BUILD_APK_PER_CPU_ARCHITECTURE, "true/false"),
        ArgumentDescriptor::optional(DISABLE_DEPTH_AND_STENCIL_BUFFERS, "true/false"),
        ArgumentDescriptor::optional(FORCE_SD_CARD_PERMISSION, "true/false"),
        ArgumentDescriptor::optional(FORCE_INTERNET_PERMISSION, "true/false"),
        ArgumentDescriptor::optional(IS_GAME, "true/false"),
        ArgumentDescriptor::optional(USE_APK_EXPANSION_FILES, "true/false"),
    ]);
}
