use htmlc_common::DEFAULT_GLOB_PATTERNS;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Text rewrite run on every template before it is parsed
pub type PreProcess = fn(&str) -> Result<String, String>;

/// Options for a directory or single-template compile
#[derive(Clone)]
pub struct ParseOptions {
    /// Patterns matched against file base names, recursively
    pub glob_patterns: Vec<String>,
    /// Prepended to the file stem before deriving the struct name
    pub struct_name_prefix: Option<String>,
    pub pre_process: Option<PreProcess>,
    /// Also emit `TAG` per file and `component_sources()` in `mod.rs`
    pub generating_for_components: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            glob_patterns: DEFAULT_GLOB_PATTERNS.iter().map(|p| p.to_string()).collect(),
            struct_name_prefix: None,
            pre_process: None,
            generating_for_components: false,
        }
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("glob_patterns", &self.glob_patterns)
            .field("struct_name_prefix", &self.struct_name_prefix)
            .field("pre_process", &self.pre_process.is_some())
            .field("generating_for_components", &self.generating_for_components)
            .finish()
    }
}

impl ParseOptions {
    pub fn components() -> Self {
        Self {
            generating_for_components: true,
            ..Self::default()
        }
    }

    pub fn with_patterns(mut self, patterns: Vec<String>) -> Self {
        if !patterns.is_empty() {
            self.glob_patterns = patterns;
        }
        self
    }
}

/// Output buffer with indentation tracking
pub struct CompilerContext {
    buffer: Rc<RefCell<String>>,
    indent_level: Rc<RefCell<usize>>,
}

impl CompilerContext {
    pub fn new() -> Self {
        Self {
            buffer: Rc::new(RefCell::new(String::new())),
            indent_level: Rc::new(RefCell::new(0)),
        }
    }

    pub fn add(&self, text: &str) {
        self.buffer.borrow_mut().push_str(text);
    }

    /// Add a line at the current indentation; multi-line text is indented
    /// line by line
    pub fn add_line(&self, text: &str) {
        for line in text.lines() {
            if line.is_empty() {
                self.add("\n");
            } else {
                self.add_indented(line);
                self.add("\n");
            }
        }
    }

    pub fn add_indented(&self, text: &str) {
        let indent = "    ".repeat(*self.indent_level.borrow());
        self.buffer.borrow_mut().push_str(&indent);
        self.buffer.borrow_mut().push_str(text);
    }

    pub fn blank_line(&self) {
        self.add("\n");
    }

    pub fn indent(&self) {
        *self.indent_level.borrow_mut() += 1;
    }

    pub fn dedent(&self) {
        let mut level = self.indent_level.borrow_mut();
        if *level > 0 {
            *level -= 1;
        }
    }

    pub fn get_output(&self) -> String {
        self.buffer.borrow().clone()
    }
}

impl Default for CompilerContext {
    fn default() -> Self {
        Self::new()
    }
}
