//! Interrupt handling: SIGINT becomes a cooperative cancellation flag.

use std::io;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use signal_hook::consts::SIGINT;
use signal_hook::flag;

/// Register SIGINT handlers and return the flag they set.
///
/// The first SIGINT only raises the flag; the copy stops at its next entry or
/// chunk. A second SIGINT while the flag is still raised exits with status 1.
pub fn install_interrupt_handler() -> io::Result<Arc<AtomicBool>> {
    let token_cancel = Arc::new(AtomicBool::new(false));
    // Order matters: the shutdown check must see the flag before it is set.
    flag::register_conditional_shutdown(SIGINT, 1, Arc::clone(&token_cancel))?;
    flag::register(SIGINT, Arc::clone(&token_cancel))?;
    Ok(token_cancel)
}
