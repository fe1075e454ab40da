/// Toggle-scoped storage for one optional overlay layer.
///
/// Collapses the per-layer "keep or null out" policy into a single
/// type: disabling drops the cached data immediately, data pushed while
/// disabled is discarded, and enabling starts from empty until the
/// server delivers a fresh payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerSlot<T> {
    Disabled,
    Enabled(Option<T>),
}

impl<T> Default for LayerSlot<T> {
    fn default() -> Self {
        LayerSlot::Disabled
    }
}

impl<T> LayerSlot<T> {
    pub fn is_enabled(&self) -> bool {
        matches!(self, LayerSlot::Enabled(_))
    }

    /// Flip the toggle. Turning off always clears; turning on while
    /// already on keeps the current data.
    pub fn set_enabled(&mut self, enabled: bool) {
        match (enabled, &*self) {
            (true, LayerSlot::Disabled) => *self = LayerSlot::Enabled(None),
            (false, _) => *self = LayerSlot::Disabled,
            (true, LayerSlot::Enabled(_)) => {}
        }
    }

    /// Store `data` if the layer is enabled; discard it otherwise.
    pub fn accept(&mut self, data: T) {
        if let LayerSlot::Enabled(slot) = self {
            *slot = Some(data);
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LayerSlot::Enabled(Some(data)) => Some(data),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LayerSlot;

    #[test]
    fn disabled_slot_discards_data() {
        let mut slot: LayerSlot<&str> = LayerSlot::Disabled;
        slot.accept("lanes");
        assert_eq!(slot.data(), None);
    }

    #[test]
    fn disabling_clears_immediately() {
        let mut slot = LayerSlot::Enabled(None);
        slot.accept("lanes");
        assert_eq!(slot.data(), Some(&"lanes"));

        slot.set_enabled(false);
        assert_eq!(slot.data(), None);

        // Re-enable starts empty; no stale payload survives the flip.
        slot.set_enabled(true);
        assert_eq!(slot.data(), None);
        assert!(slot.is_enabled());
    }

    #[test]
    fn enabling_twice_keeps_current_data() {
        let mut slot = LayerSlot::Enabled(None);
        slot.accept("lanes");
        slot.set_enabled(true);
        assert_eq!(slot.data(), Some(&"lanes"));
    }
}
