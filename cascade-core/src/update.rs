// SPDX-License-Identifier: MIT OR Apache-2.0

use bitflags::bitflags;

bitflags! {
    /// What the host needs to redo after the menu handled an event.
    ///
    /// Returned from every entry point that may mutate the element tree so
    /// the host can decide whether to relayout or just repaint.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Update: u8 {
        /// Classes or positions changed, repaint is enough.
        const DRAW = 0b0001;
        /// Elements were attached or detached.
        const LAYOUT = 0b0010;
        /// Keyboard focus moved.
        const FOCUS = 0b0100;
        /// A menu action ran; its own update bits are merged in.
        const EVAL = 0b1000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_flags() {
        let mut update = Update::empty();
        update |= Update::DRAW;
        update |= Update::LAYOUT | Update::FOCUS;
        assert!(update.contains(Update::DRAW | Update::LAYOUT));
        assert!(!update.contains(Update::EVAL));
    }
}
