use std::cell::RefCell;
use std::rc::Rc;

use crate::compiler::Evaluator;

/// the one place the current evaluator lives
///
/// The editor writes to it on every source change and the render loop reads
/// it once per frame. Both sit on the same thread, so a shared `RefCell` is
/// enough: a frame always sees either the old or the new evaluator. Every
/// install bumps the generation, which is how the render loop notices it has
/// to restart its clock.
#[derive(Debug, Clone, Default)]
pub struct EvaluatorSlot {
    inner: Rc<RefCell<Installed>>,
}

#[derive(Debug, Default)]
struct Installed {
    evaluator: Option<Rc<Evaluator>>,
    generation: u64,
}

/// what the render loop saw at the start of a frame
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub evaluator: Option<Rc<Evaluator>>,
    pub generation: u64,
}

impl EvaluatorSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// replace the current evaluator (or clear it); the previous one is
    /// dropped as soon as no frame holds it
    pub fn install(&self, evaluator: Option<Evaluator>) -> u64 {
        let mut installed = self.inner.borrow_mut();
        installed.evaluator = evaluator.map(Rc::new);
        installed.generation += 1;
        installed.generation
    }

    pub fn read(&self) -> Snapshot {
        let installed = self.inner.borrow();
        Snapshot {
            evaluator: installed.evaluator.clone(),
            generation: installed.generation,
        }
    }

    pub fn is_active(&self) -> bool {
        self.inner.borrow().evaluator.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;

    #[test]
    fn test_starts_empty() {
        let slot = EvaluatorSlot::new();
        assert!(!slot.is_active());
        assert_eq!(slot.read().generation, 0);
    }

    #[test]
    fn test_handles_share_one_slot() {
        let writer = EvaluatorSlot::new();
        let reader = writer.clone();
        writer.install(compile("x").ok());
        assert!(reader.is_active());
        assert_eq!(reader.read().evaluator.unwrap().source(), "x");
    }

    #[test]
    fn test_every_install_bumps_generation() {
        let slot = EvaluatorSlot::new();
        assert_eq!(slot.install(compile("x").ok()), 1);
        assert_eq!(slot.install(compile(")(").ok()), 2);
        assert!(!slot.is_active());
        assert_eq!(slot.install(compile("x").ok()), 3);
    }

    #[test]
    fn test_replaced_evaluator_is_dropped() {
        let slot = EvaluatorSlot::new();
        slot.install(compile("x").ok());
        let old = Rc::downgrade(&slot.read().evaluator.unwrap());
        for n in 0..100 {
            slot.install(compile(&format!("x + {n}")).ok());
        }
        assert!(old.upgrade().is_none());
        assert_eq!(Rc::strong_count(&slot.read().evaluator.unwrap()), 2);
    }
}
