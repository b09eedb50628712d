//! Typed single-slot handoff between a caller and a void-returning walk.
//!
//! [`SqlAstWalker`](hql_syntax::ast::visitor::SqlAstWalker) methods return
//! nothing, so a translator that needs the result of a sub-walk asks the
//! shelf for it: [`AstWalkerShelf::unshelve`] runs the walk and collects the
//! single value the walk put on the shelf with [`AstWalkerShelf::shelve`].

use std::{
    any::{Any, TypeId},
    cell::{Cell, RefCell},
    fmt,
    marker::PhantomData,
};
use thiserror::Error;
use tracing::{trace, warn};

/// Named, typed key for values passed through the shelf.
pub struct TypeTag<T: 'static> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> TypeTag<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn erase(&self) -> ErasedTag {
        ErasedTag {
            name: self.name,
            type_id: TypeId::of::<T>(),
        }
    }
}

impl<T: 'static> Clone for TypeTag<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for TypeTag<T> {}

impl<T: 'static> fmt::Debug for TypeTag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({})", self.name)
    }
}

/// Tags are equal when both their name and value type agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ErasedTag {
    name: &'static str,
    type_id: TypeId,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolViolation {
    #[error("Shelf already holds a value shelved as '{occupied_by}' (while handling '{tag}')")]
    SlotOccupied {
        tag: &'static str,
        occupied_by: &'static str,
    },

    #[error("Value shelved as '{actual}' while '{expected}' was expected")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Value shelved as '{0}' outside of any unshelve")]
    NoExpectation(&'static str),

    #[error("Nothing was shelved as '{0}'")]
    NothingShelved(&'static str),
}

/// Single slot plus the tag the innermost pending `unshelve` expects.
///
/// Interior mutability keeps the API usable from `&self` inside walker
/// callbacks; it also makes the shelf `!Sync`, so each translation owns one.
#[derive(Default)]
pub struct AstWalkerShelf {
    expected: Cell<Option<ErasedTag>>,
    slot: RefCell<Option<(ErasedTag, Box<dyn Any>)>>,
    fault: RefCell<Option<ProtocolViolation>>,
    depth: Cell<usize>,
}

impl AstWalkerShelf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `shelver`, which must shelve exactly one value under `tag`, and
    /// returns that value. Nests to any depth: the expectation of an outer
    /// call is restored once the inner call returns.
    pub fn unshelve<T: 'static>(
        &self,
        tag: &TypeTag<T>,
        shelver: impl FnOnce(),
    ) -> Result<T, ProtocolViolation> {
        if let Some((held, _)) = self.slot.borrow().as_ref() {
            return Err(ProtocolViolation::SlotOccupied {
                tag: tag.name,
                occupied_by: held.name,
            });
        }

        {
            let _pending = PendingUnshelve::enter(self, tag.erase());
            shelver();
        }

        let shelved = self.slot.borrow_mut().take();
        if let Some(fault) = self.fault.borrow_mut().take() {
            return Err(fault);
        }

        match shelved {
            Some((held, value)) => {
                value
                    .downcast::<T>()
                    .map(|v| *v)
                    .map_err(|_| ProtocolViolation::TypeMismatch {
                        expected: tag.name,
                        actual: held.name,
                    })
            }
            None => Err(ProtocolViolation::NothingShelved(tag.name)),
        }
    }

    /// Puts `value` on the shelf for the enclosing `unshelve`.
    ///
    /// Misuse cannot be reported from here, since callers are void walker
    /// methods: the first violation is recorded, the value is dropped, and
    /// the enclosing `unshelve` returns the violation.
    pub fn shelve<T: 'static>(&self, tag: &TypeTag<T>, value: T) {
        let erased = tag.erase();

        match self.expected.get() {
            None => self.latch(ProtocolViolation::NoExpectation(tag.name)),
            Some(expected) if expected != erased => self.latch(ProtocolViolation::TypeMismatch {
                expected: expected.name,
                actual: tag.name,
            }),
            Some(_) => {
                let mut slot = self.slot.borrow_mut();
                match slot.as_ref() {
                    Some((held, _)) => self.latch(ProtocolViolation::SlotOccupied {
                        tag: tag.name,
                        occupied_by: held.name,
                    }),
                    None => *slot = Some((erased, Box::new(value))),
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slot.borrow().is_none()
    }

    /// Number of pending `unshelve` calls.
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    fn latch(&self, violation: ProtocolViolation) {
        warn!(%violation, "Shelf protocol violation");
        let mut fault = self.fault.borrow_mut();
        if fault.is_none() {
            *fault = Some(violation);
        }
    }
}

/// Expectation of one pending `unshelve`. Dropping it puts back the
/// enclosing expectation, also when the shelver unwinds.
struct PendingUnshelve<'a> {
    shelf: &'a AstWalkerShelf,
    previous: Option<ErasedTag>,
}

impl<'a> PendingUnshelve<'a> {
    fn enter(shelf: &'a AstWalkerShelf, tag: ErasedTag) -> Self {
        let previous = shelf.expected.replace(Some(tag));
        let depth = shelf.depth.get() + 1;
        shelf.depth.set(depth);
        trace!(tag = tag.name, depth, "Unshelving");

        Self { shelf, previous }
    }
}

impl Drop for PendingUnshelve<'_> {
    fn drop(&mut self) {
        self.shelf.depth.set(self.shelf.depth.get().saturating_sub(1));
        self.shelf.expected.set(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    const NUMBER: TypeTag<usize> = TypeTag::new("number");
    const TEXT: TypeTag<String> = TypeTag::new("text");
    const NAMES: TypeTag<Vec<String>> = TypeTag::new("names");

    #[test]
    fn test_round_trip() {
        let shelf = AstWalkerShelf::new();
        let value = shelf.unshelve(&TEXT, || shelf.shelve(&TEXT, "hello".to_string()));

        assert_eq!(value, Ok("hello".to_string()));
        assert!(shelf.is_empty());
        assert_eq!(shelf.depth(), 0);
    }

    #[test]
    fn test_three_level_nesting() {
        let shelf = AstWalkerShelf::new();

        let total = shelf.unshelve(&NUMBER, || {
            let description = shelf.unshelve(&TEXT, || {
                let names = shelf
                    .unshelve(&NAMES, || {
                        assert_eq!(shelf.depth(), 3);
                        shelf.shelve(&NAMES, vec!["name".to_string(), "address".to_string()]);
                    })
                    .unwrap();
                shelf.shelve(&TEXT, format!("fields: {}", names.join(",")));
            });
            let description = description.unwrap();
            shelf.shelve(&NUMBER, description.len() + 20);
        });

        assert_eq!(total, Ok(40));
        assert!(shelf.is_empty());
    }

    #[test]
    fn test_nothing_shelved() {
        let shelf = AstWalkerShelf::new();
        let result = shelf.unshelve(&TEXT, || {});

        assert_eq!(result, Err(ProtocolViolation::NothingShelved("text")));
    }

    #[test]
    fn test_double_shelve() {
        let shelf = AstWalkerShelf::new();
        let result = shelf.unshelve(&TEXT, || {
            shelf.shelve(&TEXT, "a".to_string());
            shelf.shelve(&TEXT, "b".to_string());
        });

        assert_eq!(
            result,
            Err(ProtocolViolation::SlotOccupied {
                tag: "text",
                occupied_by: "text"
            })
        );
        assert!(shelf.is_empty());
    }

    #[test]
    fn test_mismatched_tag() {
        let shelf = AstWalkerShelf::new();
        let result = shelf.unshelve(&TEXT, || shelf.shelve(&NUMBER, 7));

        assert_eq!(
            result,
            Err(ProtocolViolation::TypeMismatch {
                expected: "text",
                actual: "number"
            })
        );
    }

    #[test]
    fn test_same_name_different_type_does_not_match() {
        const OTHER_TEXT: TypeTag<&'static str> = TypeTag::new("text");

        let shelf = AstWalkerShelf::new();
        let result = shelf.unshelve(&TEXT, || shelf.shelve(&OTHER_TEXT, "x"));

        assert!(matches!(result, Err(ProtocolViolation::TypeMismatch { .. })));
    }

    #[traced_test]
    #[test]
    fn test_shelve_without_unshelve() {
        let shelf = AstWalkerShelf::new();
        shelf.shelve(&TEXT, "orphan".to_string());

        assert!(shelf.is_empty());
        assert!(logs_contain("Shelf protocol violation"));

        // Reported by the next unshelve
        let result = shelf.unshelve(&TEXT, || shelf.shelve(&TEXT, "x".to_string()));
        assert_eq!(result, Err(ProtocolViolation::NoExpectation("text")));
    }

    #[test]
    fn test_inner_expectation_is_restored() {
        let shelf = AstWalkerShelf::new();

        let result = shelf.unshelve(&NUMBER, || {
            let text = shelf.unshelve(&TEXT, || shelf.shelve(&TEXT, "abc".to_string()));
            // The outer expectation is back in force
            shelf.shelve(&NUMBER, text.map(|t| t.len()).unwrap_or(0));
        });

        assert_eq!(result, Ok(3));
    }

    #[test]
    fn test_expectation_restored_after_panicking_shelver() {
        let shelf = AstWalkerShelf::new();

        let result = shelf.unshelve(&NUMBER, || {
            let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                let _ = shelf.unshelve(&TEXT, || panic!("walker failed"));
            }));
            assert!(unwound.is_err());
            assert_eq!(shelf.depth(), 1);

            shelf.shelve(&NUMBER, 5);
        });

        assert_eq!(result, Ok(5));
        assert_eq!(shelf.depth(), 0);

        // No stale expectation is left behind once the outer call is done
        let orphan = shelf.unshelve(&TEXT, || {});
        assert_eq!(orphan, Err(ProtocolViolation::NothingShelved("text")));
        shelf.shelve(&TEXT, "late".to_string());
        let next = shelf.unshelve(&TEXT, || shelf.shelve(&TEXT, "x".to_string()));
        assert_eq!(next, Err(ProtocolViolation::NoExpectation("text")));
    }
}
