use thiserror::Error;

/// Which of the two generated programs a shader error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Interior fill: striped hue band fading to the center color.
    Glass,
    /// Inward-growing rim masked by angular segments.
    Border,
}

impl std::fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderKind::Glass => write!(f, "glass"),
            ShaderKind::Border => write!(f, "border"),
        }
    }
}

#[derive(Error, Debug)]
pub enum GlassError {
    #[error("Failed to compile {kind} shader: {message}")]
    ShaderCompilation { kind: ShaderKind, message: String },
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("Filter graph construction failed: {0}")]
    FilterGraph(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, GlassError>;
