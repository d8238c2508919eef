//! Declarative argument schemas and help text generation

/// One recognized argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentDescriptor {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

impl ArgumentDescriptor {
    /// Describe an optional argument
    pub const fn optional(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            required: false,
            description,
        }
    }

    /// Describe a required argument
    pub const fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            required: true,
            description,
        }
    }
}

/// The set of arguments one builder, processor or the pipeline itself understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentSchema {
    descriptors: &'static [ArgumentDescriptor],
}

impl ArgumentSchema {
    pub const fn new(descriptors: &'static [ArgumentDescriptor]) -> Self {
        Self { descriptors }
    }

    /// A schema that declares nothing
    pub const fn empty() -> Self {
        Self { descriptors: &[] }
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Names of every required argument, in declaration order
    pub fn required_names(&self) -> impl Iterator<Item = &'static str> {
        self.descriptors
            .iter()
            .filter(|d| d.required)
            .map(|d| d.name)
    }

    /// Render every descriptor on its own line, prefixed by `indent` spaces
    ///
    /// Format: `<name> [required] - <description>`; declaration order is kept
    /// so the output is stable between runs.
    pub fn describe(&self, indent: usize) -> String {
        let pad = " ".repeat(indent);
        let width = self
            .descriptors
            .iter()
            .map(|d| d.name.len())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for descriptor in self.descriptors {
            let marker = if descriptor.required { " [required]" } else { "" };
            let head = format!("{}{}", descriptor.name, marker);
            let line = if descriptor.description.is_empty() {
                format!("{}{}", pad, head)
            } else {
                format!(
                    "{}{:<w$} - {}",
                    pad,
                    head,
                    descriptor.description,
                    w = width + " [required]".len()
                )
            };
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

/// Prefix every non-empty line of `text` with `indent` spaces
pub fn pad_left_lines(text: &str, indent: usize) -> String {
    let pad = " ".repeat(indent);
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
