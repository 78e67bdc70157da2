/// Type of body, determining how it behaves in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    /// Dynamic bodies are integrated and respond to forces and joints
    Dynamic,

    /// Static bodies never move. Each space owns one, the ground, which
    /// anchors immovable geometry and friction joints.
    Static,
}

impl BodyType {
    /// Returns true for bodies that take part in integration
    #[inline]
    pub fn is_dynamic(self) -> bool {
        matches!(self, Self::Dynamic)
    }
}
