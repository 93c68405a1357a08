use crate::assets::buffer::{ImageView, PixelBuffer, SharedImage};

/// Number of slots in an image stack.
pub const SLOT_COUNT: usize = 4;

/// Identifies one load request for one slot.
///
/// Serials are issued monotonically by the owning [`SlotCache`](crate::SlotCache), so a
/// token from an earlier `populate` never compares equal to a later one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadToken {
    slot: usize,
    serial: u64,
}

impl LoadToken {
    pub(crate) fn new(slot: usize, serial: u64) -> Self {
        Self { slot, serial }
    }

    pub fn slot(self) -> usize {
        self.slot
    }

    pub fn serial(self) -> u64 {
        self.serial
    }
}

impl std::fmt::Display for LoadToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "slot{}#{}", self.slot, self.serial)
    }
}

/// What a slot currently shows.
#[derive(Debug, Default)]
pub enum SlotContent {
    /// Never populated.
    #[default]
    Empty,
    /// Waiting for a load, or the load failed.
    Placeholder(SharedImage),
    /// A successfully loaded image owned by the slot.
    Loaded(PixelBuffer),
    /// Zero URLs were supplied to the whole stack.
    EmptyStackBorder(SharedImage),
}

impl SlotContent {
    pub fn kind(&self) -> SlotKind {
        match self {
            Self::Empty => SlotKind::Empty,
            Self::Placeholder(_) => SlotKind::Placeholder,
            Self::Loaded(_) => SlotKind::Loaded,
            Self::EmptyStackBorder(_) => SlotKind::EmptyStackBorder,
        }
    }

    /// Drawable pixels, if any. Recycled buffers yield `None`.
    pub fn view(&self) -> Option<ImageView> {
        match self {
            Self::Empty => None,
            Self::Placeholder(img) | Self::EmptyStackBorder(img) => Some(img.view().clone()),
            Self::Loaded(buf) => buf.view(),
        }
    }
}

/// Discriminant of [`SlotContent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Empty,
    Placeholder,
    Loaded,
    EmptyStackBorder,
}

/// One position in the stack: its content and the token of its in-flight load.
#[derive(Debug, Default)]
pub struct Slot {
    pub(crate) content: SlotContent,
    pub(crate) pending: Option<LoadToken>,
}

impl Slot {
    pub fn content(&self) -> &SlotContent {
        &self.content
    }

    pub fn kind(&self) -> SlotKind {
        self.content.kind()
    }

    pub fn pending(&self) -> Option<LoadToken> {
        self.pending
    }

    pub fn view(&self) -> SlotView {
        SlotView {
            kind: self.content.kind(),
            image: self.content.view(),
            pending: self.pending,
        }
    }
}

/// Point-in-time copy of a slot, read by the compositor.
#[derive(Clone, Debug)]
pub struct SlotView {
    pub kind: SlotKind,
    pub image: Option<ImageView>,
    pub pending: Option<LoadToken>,
}

impl SlotView {
    /// A slot with nothing to draw.
    pub fn empty() -> Self {
        Self {
            kind: SlotKind::Empty,
            image: None,
            pending: None,
        }
    }
}
