/// Classifies any fatal error in the run into one of §6's process exit codes,
/// without string matching. Each crate's own error enum implements
/// `exit_kind(&self) -> SimExitKind`; `sim-cli` calls it once at the top of
/// `main` on the outermost error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SimExitKind {
    Success,
    ConfigError,
    DataError,
    RuntimeError,
}

impl SimExitKind {
    pub fn code(self) -> i32 {
        match self {
            SimExitKind::Success => 0,
            SimExitKind::ConfigError => 1,
            SimExitKind::DataError => 2,
            SimExitKind::RuntimeError => 3,
        }
    }
}
