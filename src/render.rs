pub(crate) mod blend;
pub(crate) mod blur;
pub(crate) mod canvas;
pub(crate) mod cpu;
