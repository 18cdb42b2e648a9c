// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros for reducing boilerplate.
//!
//! - [`simple_display!`] — `Display` impl mapping enum variants to string literals
//! - [`test_builder!`] — fluent test builder around a seeded target value

/// Generate a `Display` impl that maps enum variants to string literals.
///
/// Unit variants match directly; data-carrying variants use `(..)` or
/// `{..}` to ignore fields.
///
/// ```ignore
/// crate::simple_display! {
///     MyEnum {
///         Foo => "foo",
///         Bar(..) => "bar",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident $(( $($ignore:tt)* ))? $({ $($ignore_named:tt)* })? => $str:expr ),+ $(,)? }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $( Self::$variant $(( $($ignore)* ))? $({ $($ignore_named)* })? => $str, )+
                })
            }
        }
    };
}

/// Generate a fluent test builder that wraps a seeded target value.
///
/// The builder holds a `$target` built from the seed expression; each
/// setter edits one field of it in place and `build()` hands the value
/// back. There is no field mirroring: defaults live in the seed, not in
/// the builder.
///
/// Setter groups:
/// - `into { field: Type }` — setter takes `impl Into<Type>`
/// - `raw { field: Type }` — setter takes `Type` as-is
/// - `wrap { field: Type }` — field is `Option<Type>`, setter wraps in `Some`
///
/// All generated items are gated behind `#[cfg(any(test, feature = "test-support"))]`.
///
/// ```ignore
/// crate::test_builder! {
///     pub struct FooBuilder for Foo = Foo::empty("test");
///     into { name: String }
///     raw { count: u32 }
///     wrap { label: String }
/// }
/// ```
#[macro_export]
macro_rules! test_builder {
    (
        pub struct $builder:ident for $target:ident = $seed:expr;
        $(into { $( $into_field:ident : $into_ty:ty ),* $(,)? })?
        $(raw { $( $raw_field:ident : $raw_ty:ty ),* $(,)? })?
        $(wrap { $( $wrap_field:ident : $wrap_ty:ty ),* $(,)? })?
    ) => {
        #[cfg(any(test, feature = "test-support"))]
        pub struct $builder($target);

        #[cfg(any(test, feature = "test-support"))]
        impl $builder {
            $($(
                pub fn $into_field(mut self, v: impl Into<$into_ty>) -> Self {
                    self.0.$into_field = v.into();
                    self
                }
            )*)?

            $($(
                pub fn $raw_field(mut self, v: $raw_ty) -> Self {
                    self.0.$raw_field = v;
                    self
                }
            )*)?

            $($(
                pub fn $wrap_field(mut self, v: impl Into<$wrap_ty>) -> Self {
                    self.0.$wrap_field = Some(v.into());
                    self
                }
            )*)?

            pub fn build(self) -> $target {
                self.0
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $target {
            /// Start a builder seeded with test defaults.
            pub fn builder() -> $builder {
                $builder($seed)
            }
        }
    };
}
