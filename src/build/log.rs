//! Logging sink handed to every build phase

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Minimal logging capability
pub trait BuildLog {
    fn log(&self, message: &str);

    fn warn(&self, message: &str) {
        self.log(&format!("warning: {}", message));
    }
}

/// Sink that keeps every line in memory
///
/// Clones share the same buffer.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    lines: Rc<RefCell<Vec<String>>>,
}

#[cfg(test)]
impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Whole log as one string
    pub fn contents(&self) -> String {
        self.lines.borrow().join("\n")
    }
}

#[cfg(test)]
impl BuildLog for MemoryLog {
    fn log(&self, message: &str) {
        self.lines.borrow_mut().push(message.to_string());
    }
}
