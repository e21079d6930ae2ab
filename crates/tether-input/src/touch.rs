use tether_core::TouchPhase;

/// Number of simultaneously tracked touches. Ids outside `0..MAX_TOUCH_SLOTS`
/// are ignored.
pub const MAX_TOUCH_SLOTS: usize = 32;

/// Last `(phase, x, y)` forwarded for one touch id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchSlot {
    pub phase: TouchPhase,
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotUpdate {
    Changed,
    Unchanged,
    OutOfRange,
}

/// Fixed-size de-duplication table for touch updates.
#[derive(Clone, Debug)]
pub struct TouchSlots {
    slots: [Option<TouchSlot>; MAX_TOUCH_SLOTS],
}

impl Default for TouchSlots {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchSlots {
    pub fn new() -> Self {
        Self {
            slots: [None; MAX_TOUCH_SLOTS],
        }
    }

    fn index(id: i32) -> Option<usize> {
        usize::try_from(id).ok().filter(|&i| i < MAX_TOUCH_SLOTS)
    }

    pub fn get(&self, id: i32) -> Option<&TouchSlot> {
        Self::index(id).and_then(|i| self.slots[i].as_ref())
    }

    /// Stores `next` unless it equals what was last stored for `id`.
    pub fn update(&mut self, id: i32, next: TouchSlot) -> SlotUpdate {
        let Some(i) = Self::index(id) else {
            return SlotUpdate::OutOfRange;
        };
        if self.slots[i] == Some(next) {
            return SlotUpdate::Unchanged;
        }
        self.slots[i] = Some(next);
        SlotUpdate::Changed
    }

    pub fn clear(&mut self) {
        self.slots = [None; MAX_TOUCH_SLOTS];
    }
}
