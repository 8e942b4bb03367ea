//! Shared fixtures for the micro-gemini benchmarks.

/// One benchmarked request line, tagged with how long it is.
#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    length: LineLength,
    file: TestFile,
}

impl TestCase {
    pub fn new(name: &'static str, length: LineLength, file: TestFile) -> Self {
        Self { name, length, file }
    }

    pub fn short(name: &'static str, file: TestFile) -> Self {
        Self::new(name, LineLength::Short, file)
    }

    /// A line close to the 1024 byte request limit.
    pub fn long(name: &'static str, file: TestFile) -> Self {
        Self::new(name, LineLength::Long, file)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn length(&self) -> LineLength {
        self.length
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }

    pub fn file_name(&self) -> &'static str {
        self.file().file_name
    }
}

/// A fixture file under `resources/request`, embedded with `include_str!`.
#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    content: &'static str,
}

impl TestFile {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }
}

#[derive(Clone, Copy, Debug)]
pub enum LineLength {
    Short,
    Long,
}
