//! Compile and run tilde programs.
//!
//! ```text
//! quad(x, y) = sqrt(x**2 + y**2)
//! pairs = join {
//!     a ~ muons
//!     b ~ muons[1:]
//!     mass = (a + b).mass
//! }
//! ```
//!
//! [`Program::compile`] parses once; [`Program::run`] evaluates the
//! statements against caller-supplied bindings and returns every binding of
//! the program's top-level scope. A compiled program is immutable and can
//! be run any number of times, from any number of threads.

mod error;
mod program;

#[cfg(test)]
mod tests;

pub use error::{Error, PartialRun};
pub use program::{Bindings, Program};
pub use tilde_eval::{
    BinaryOp, ErrorKind, EvalConfig, EvalError, HostError, HostObject, Identity, Record,
    UnaryOp, Value, ValueDisplay, DEFAULT_MAX_CALL_DEPTH,
};
pub use tilde_parse::{ParseError, ParseErrorKind};

use std::sync::Once;

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "TILDE_LOG";

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber for debug output.
///
/// Does nothing unless `TILDE_LOG` is set, e.g. `TILDE_LOG=tilde_eval=trace`.
/// Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var_os(LOG_ENV).is_some() {
            // Another subscriber may already be installed; keep it.
            let _ = tracing_subscriber::registry()
                .with(EnvFilter::from_env(LOG_ENV))
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .try_init();
        }
    });
}

/// Compile `source` and run it once.
pub fn run<'n>(
    source: &str,
    bindings: impl IntoIterator<Item = (&'n str, Value)>,
) -> Result<Bindings, Error> {
    let program = Program::compile(source)?;
    Ok(program.run(bindings)?)
}
