//! Capability contracts.
//!
//! A contract is a Rust trait describing one role. Implementations cannot
//! skip an operation: every trait method must exist, and the only failures
//! an operation may report are the ones in its return type. The registry
//! indexes bindings by a marker type implementing [`Contract`] that names
//! the trait object it hands out.

/// Marker describing one capability contract.
///
/// # Example
///
/// ```rust
/// use switchyard::registry::Contract;
///
/// pub trait Notifier: Send + Sync {
///     fn notify(&self, recipient: &str, message: &str) -> Result<(), String>;
/// }
///
/// pub struct Notification;
///
/// impl Contract for Notification {
///     type Object = dyn Notifier;
///     const NAME: &'static str = "notification";
/// }
/// ```
pub trait Contract: 'static {
    /// Type handed out by `resolve`, usually `dyn SomeTrait`.
    type Object: ?Sized + Send + Sync + 'static;

    /// Name used in errors and binding listings.
    const NAME: &'static str;
}

/// Declare a contract marker for a trait object type.
///
/// # Example
///
/// ```
/// use switchyard::declare_contract;
///
/// pub trait Player: Send + Sync {
///     fn play(&self, track: &str) -> String;
/// }
///
/// declare_contract!(pub Playback => dyn Player, "playback");
/// ```
#[macro_export]
macro_rules! declare_contract {
    ($(#[$meta:meta])* $vis:vis $name:ident => $object:ty, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        $vis struct $name;

        impl $crate::registry::Contract for $name {
            type Object = $object;
            const NAME: &'static str = $label;
        }
    };
}

#[cfg(test)]
mod tests {
    use super::Contract;

    trait Greeter: Send + Sync {
        fn greet(&self) -> &'static str;
    }

    declare_contract!(Greeting => dyn Greeter, "greeting");

    #[test]
    fn declared_contract_has_name() {
        assert_eq!(Greeting::NAME, "greeting");
    }
}
