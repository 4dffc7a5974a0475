//! Scoped interrupt masking
//!
//! There are exactly two execution contexts in this firmware: the
//! cooperative foreground loop and one hardware interrupt that may
//! preempt it at any instruction boundary (and never re-enters itself).
//! The ring buffers shared between the two are the only cross-context
//! state, and masking the interrupt for the span of a bulk buffer
//! operation is the only synchronization primitive. This is not a
//! mutex: the interrupt side never blocks, so there is no priority
//! inversion to model.

/// Scoped disable/enable of the peripheral interrupt
pub trait IrqMask {
    /// Run `f` with the interrupt masked
    ///
    /// Any foreground sequence of more than one operation on a buffer
    /// shared with the interrupt context must run inside this bracket.
    /// Single-byte operations performed from the interrupt itself need
    /// no bracket, as the handler cannot be preempted.
    fn masked<R>(&mut self, f: impl FnOnce() -> R) -> R;
}
