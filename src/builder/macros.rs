//! Macros for ergonomic catalog construction.

/// Generate a closed variant enum with codes, labels and a `Variant` impl.
///
/// The generated type also gets `ALL` (declaration order) and `catalog()`,
/// which builds a [`Catalog`](crate::core::Catalog) named after the enum.
///
/// # Example
///
/// ```
/// use switchyard::variant_enum;
/// use switchyard::core::Variant;
///
/// variant_enum! {
///     pub enum TaskStatus {
///         Todo = "TODO" => "Not started",
///         Doing = "DOING" => "In progress",
///         Done = "DONE" => "Finished",
///     }
///     final: [Done]
/// }
///
/// assert_eq!(TaskStatus::Doing.code(), "DOING");
/// assert!(TaskStatus::Done.is_final());
/// assert_eq!(TaskStatus::catalog().unwrap().len(), 3);
/// ```
#[macro_export]
macro_rules! variant_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $code:literal => $label:literal
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),*];

            /// Catalog of all variants, named after the enum.
            pub fn catalog() -> Result<$crate::core::Catalog<Self>, $crate::core::CatalogError> {
                $crate::core::Catalog::new(stringify!($name), Self::ALL.iter().copied())
            }
        }

        impl $crate::core::Variant for $name {
            fn code(&self) -> &str {
                match self {
                    $(Self::$variant => $code),*
                }
            }

            fn label(&self) -> &str {
                match self {
                    $(Self::$variant => $label),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }
    };
}
