//! Actions: content-aware transformation steps.
//!
//! Any type implementing [`Process`] can be wrapped into an [`Action`], which
//! erases the concrete type so a pipeline can hold unrelated steps in one
//! ordered list. Closure pairs work too, via [`Action::from_fn`].
//!
//! - **decode**: encoded image bytes to a decoded bitmap
//! - **decompress**: ZIP archive to its first file entry
//! - **parse_json**: JSON text to a parsed document

pub mod decode;
pub mod decompress;
pub mod parse_json;

pub use decode::DecodeImageAction;
pub use decompress::DecompressAction;
pub use parse_json::ParseJsonAction;

use std::fmt;
use std::sync::Arc;

use crate::config::Config;
use crate::error::ActionError;
use crate::item::Item;

/// The two-method shape every action conforms to.
///
/// `process` is only called after `can_process` returned true for the same
/// item. Implementations must be `Send + Sync` so one action value can be
/// shared by pipelines running on different threads.
pub trait Process: Send + Sync {
    /// Action name for logging and errors.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Whether this action applies to the item. Must not have observable
    /// side effects.
    fn can_process(&self, item: &Item) -> bool;

    /// Build a new item from the given one.
    fn process(&self, item: &Item) -> Result<Item, ActionError>;
}

/// A type-erased action.
///
/// Cloning is cheap and shares the wrapped value.
#[derive(Clone)]
pub struct Action {
    inner: Arc<dyn Process>,
}

impl Action {
    /// Wrap any [`Process`] implementation.
    pub fn new<P: Process + 'static>(process: P) -> Self {
        Self {
            inner: Arc::new(process),
        }
    }

    /// Build an action from a capability check and a transform.
    pub fn from_fn<C, F>(name: impl Into<String>, can_process: C, process: F) -> Self
    where
        C: Fn(&Item) -> bool + Send + Sync + 'static,
        F: Fn(&Item) -> Result<Item, ActionError> + Send + Sync + 'static,
    {
        Self::new(FnAction {
            name: name.into(),
            can_process,
            process,
        })
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn can_process(&self, item: &Item) -> bool {
        self.inner.can_process(item)
    }

    pub fn process(&self, item: &Item) -> Result<Item, ActionError> {
        self.inner.process(item)
    }
}

impl<P: Process + 'static> From<P> for Action {
    fn from(process: P) -> Self {
        Self::new(process)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("name", &self.name()).finish()
    }
}

struct FnAction<C, F> {
    name: String,
    can_process: C,
    process: F,
}

impl<C, F> Process for FnAction<C, F>
where
    C: Fn(&Item) -> bool + Send + Sync,
    F: Fn(&Item) -> Result<Item, ActionError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn can_process(&self, item: &Item) -> bool {
        (self.can_process)(item)
    }

    fn process(&self, item: &Item) -> Result<Item, ActionError> {
        (self.process)(item)
    }
}

/// The standard decode, decompress and parse actions, in that order.
pub fn standard_actions(config: &Config) -> Vec<Action> {
    vec![
        Action::new(DecodeImageAction::new(config.limits.clone())),
        Action::new(DecompressAction::new(config.limits.clone())),
        Action::new(ParseJsonAction::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Kind, Payload};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Relabel {
        from: Kind,
        to: &'static str,
    }

    impl Process for Relabel {
        fn can_process(&self, item: &Item) -> bool {
            item.kind() == self.from
        }

        fn process(&self, item: &Item) -> Result<Item, ActionError> {
            Ok(Item::new(item.payload().clone(), self.to))
        }
    }

    #[test]
    fn test_wrap_delegates() {
        let action = Action::new(Relabel {
            from: Kind::Json,
            to: "object",
        });
        let item = Item::new(Payload::Empty, "json");

        assert!(action.can_process(&item));
        let next = action.process(&item).unwrap();
        assert_eq!(next.kind(), Kind::Object);
        // The input item is untouched
        assert_eq!(item.kind(), Kind::Json);
    }

    #[test]
    fn test_default_name_is_type_name() {
        let action: Action = Relabel {
            from: Kind::Json,
            to: "object",
        }
        .into();
        assert!(action.name().ends_with("Relabel"));
    }

    #[test]
    fn test_from_fn() {
        let action = Action::from_fn(
            "zip-to-json",
            |item: &Item| item.kind() == Kind::Compressed,
            |item: &Item| Ok(Item::new(item.payload().clone(), "json")),
        );
        assert_eq!(action.name(), "zip-to-json");
        assert!(!action.can_process(&Item::new(Payload::Empty, "json")));
        assert!(action.can_process(&Item::new(Payload::Empty, "zip")));
    }

    #[test]
    fn test_can_process_is_repeatable() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let action = Action::from_fn(
            "count",
            move |_: &Item| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            },
            |item: &Item| Ok(item.clone()),
        );
        let item = Item::new(Payload::Empty, "json");

        for _ in 0..3 {
            assert!(action.can_process(&item));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(item.classifier(), "json");
    }

    #[test]
    fn test_clone_shares_inner() {
        let action = Action::from_fn("shared", |_: &Item| false, |item: &Item| Ok(item.clone()));
        let copy = action.clone();
        assert!(Arc::ptr_eq(&action.inner, &copy.inner));
    }

    #[test]
    fn test_standard_actions_order() {
        let actions = standard_actions(&Config::default());
        let names: Vec<&str> = actions.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["decode-image", "decompress", "parse-json"]);
    }

    #[test]
    fn test_action_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Action>();
    }
}
