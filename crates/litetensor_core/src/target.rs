#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compute target a storage block or event lives on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Target {
    #[default]
    Host,
    #[cfg(feature = "cuda")]
    Cuda(usize),
    #[cfg(feature = "mps")]
    Mps,
}

impl Target {
    pub fn name(&self) -> String {
        match self {
            Target::Host => "Host".to_string(),
            #[cfg(feature = "cuda")]
            Target::Cuda(id) => format!("CUDA Device {}", id),
            #[cfg(feature = "mps")]
            Target::Mps => "MPS".to_string(),
        }
    }

    /// Whether memory resident on this target can be dereferenced from the host.
    pub fn is_host_accessible(&self) -> bool {
        match self {
            Target::Host => true,
            #[cfg(feature = "cuda")]
            Target::Cuda(_) => false,
            // shared storage mode on unified memory
            #[cfg(feature = "mps")]
            Target::Mps => true,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

thread_local! {
    static DEFAULT_TARGET: std::cell::Cell<Target> = const { std::cell::Cell::new(Target::Host) };
}

pub fn get_default_target() -> Target {
    DEFAULT_TARGET.with(|t| t.get())
}

pub fn set_default_target(target: Target) {
    DEFAULT_TARGET.with(|t| t.set(target));
}

pub fn auto_set_target() {
    #[cfg(feature = "cuda")]
    set_default_target(Target::Cuda(0));
    #[cfg(feature = "mps")]
    set_default_target(Target::Mps);
    #[cfg(not(any(feature = "cuda", feature = "mps")))]
    set_default_target(Target::Host);
}
