// std
use std::io::{self, Write};

/// Destination for provisioning output.
///
/// The env block is the machine-readable part meant for a `.env` file; notices are
/// human-oriented progress lines. Callers decide where each goes by choosing the sink.
pub trait OutputSink {
	/// Writes the env block.
	fn env_block(&mut self, block: &str) -> io::Result<()>;

	/// Writes one human-oriented notice line.
	fn notice(&mut self, line: &str) -> io::Result<()>;
}

/// How stdout is connected, as observed by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkMode {
	/// Stdout is an interactive terminal; the env block is printed there once.
	Terminal,
	/// Stdout is redirected; the env block goes to stdout for the file and to stderr for display.
	Piped,
}

/// [`OutputSink`] over the process stdout/stderr.
#[derive(Clone, Copy, Debug)]
pub struct StdioSink {
	/// Routing mode.
	pub mode: SinkMode,
}
impl StdioSink {
	/// Creates a sink for the given mode.
	pub fn new(mode: SinkMode) -> Self {
		Self { mode }
	}
}
impl OutputSink for StdioSink {
	fn env_block(&mut self, block: &str) -> io::Result<()> {
		if self.mode == SinkMode::Piped {
			let mut stderr = io::stderr().lock();

			stderr.write_all(block.as_bytes())?;
			stderr.flush()?;
		}

		let mut stdout = io::stdout().lock();

		stdout.write_all(block.as_bytes())?;
		stdout.flush()
	}

	fn notice(&mut self, line: &str) -> io::Result<()> {
		writeln!(io::stderr().lock(), "{line}")
	}
}
