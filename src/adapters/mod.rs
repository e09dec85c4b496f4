// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod mock;
pub mod probe_ffprobe;
pub mod terminal_prompt;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use exec_ffmpeg::FFmpegAdapter;
pub use mock::{MockApplyAdapter, MockProbeAdapter, ScriptedPrompter};
pub use probe_ffprobe::FFprobeAdapter;
pub use terminal_prompt::TerminalPrompter;
pub use toml_config::AppConfig;
