//! Forwarders over the assertion catalogue.
//!
//! `catalogue!(mode)` lists every assertion's domain arguments once and
//! hands the list to `forward!`, which generates, per mode:
//!
//! - `require`: fail-fast free functions
//! - `assertions`: methods on [`Assertions`](crate::Assertions)
//! - `requirements`: methods on [`Requirements`](crate::Requirements)
//!
//! The context argument and the trailing message are added by `forward!`.

macro_rules! forward {
    (require: $(
        fn $name:ident $(<$($g:ident: $b:path),+>)? ($($arg:ident: $ty:ty),* $(,)?);
    )+) => {
        $(
            #[doc = concat!(
                "Fail-fast [`assert::", stringify!($name), "`](crate::assert::",
                stringify!($name), "): stops the test on failure."
            )]
            #[track_caller]
            pub fn $name $(<$($g: $b),+>)? (
                t: &(impl $crate::FailNow + ?Sized),
                $($arg: $ty,)*
                msg: impl Into<$crate::Message>,
            ) {
                if !$crate::assert::$name(t, $($arg,)* msg) {
                    t.fail_now();
                }
            }
        )+
    };
    (assertions: $(
        fn $name:ident $(<$($g:ident: $b:path),+>)? ($($arg:ident: $ty:ty),* $(,)?);
    )+) => {
        $(
            #[doc = concat!("See [`assert::", stringify!($name), "`](crate::assert::", stringify!($name), ").")]
            #[track_caller]
            pub fn $name $(<$($g: $b),+>)? (
                &self,
                $($arg: $ty,)*
                msg: impl Into<$crate::Message>,
            ) -> bool {
                $crate::assert::$name(self.t, $($arg,)* msg)
            }
        )+
    };
    (requirements: $(
        fn $name:ident $(<$($g:ident: $b:path),+>)? ($($arg:ident: $ty:ty),* $(,)?);
    )+) => {
        $(
            #[doc = concat!("See [`require::", stringify!($name), "`](crate::require::", stringify!($name), ").")]
            #[track_caller]
            pub fn $name $(<$($g: $b),+>)? (
                &self,
                $($arg: $ty,)*
                msg: impl Into<$crate::Message>,
            ) {
                $crate::require::$name(self.t, $($arg,)* msg);
            }
        )+
    };
}

macro_rules! catalogue {
    ($mode:ident) => {
        forward! { $mode:
            fn equal(expected: impl ::vouch_value::ToValue, actual: impl ::vouch_value::ToValue);
            fn not_equal(expected: impl ::vouch_value::ToValue, actual: impl ::vouch_value::ToValue);
            fn equal_values(expected: impl ::vouch_value::ToValue, actual: impl ::vouch_value::ToValue);
            fn not_equal_values(expected: impl ::vouch_value::ToValue, actual: impl ::vouch_value::ToValue);
            fn exactly(expected: impl ::vouch_value::ToValue, actual: impl ::vouch_value::ToValue);
            fn equal_exported(expected: impl ::vouch_value::ToValue, actual: impl ::vouch_value::ToValue);
            fn same(expected: impl ::vouch_value::ToValue, actual: impl ::vouch_value::ToValue);
            fn not_same(expected: impl ::vouch_value::ToValue, actual: impl ::vouch_value::ToValue);

            fn nil(object: impl ::vouch_value::ToValue);
            fn not_nil(object: impl ::vouch_value::ToValue);
            fn is_true(value: bool);
            fn is_false(value: bool);
            fn empty(object: impl ::vouch_value::ToValue);
            fn not_empty(object: impl ::vouch_value::ToValue);
            fn len(object: impl ::vouch_value::ToValue, length: usize);

            fn error(err: &(impl $crate::MaybeError + ?Sized));
            fn no_error(err: &(impl $crate::MaybeError + ?Sized));
            fn error_is(
                err: &(impl $crate::MaybeError + ?Sized),
                target: &(impl ::std::error::Error + PartialEq + 'static),
            );
            fn not_error_is(
                err: &(impl $crate::MaybeError + ?Sized),
                target: &(impl ::std::error::Error + PartialEq + 'static),
            );
            fn error_contains(err: &(impl $crate::MaybeError + ?Sized), contains: &str);
            fn equal_error(err: &(impl $crate::MaybeError + ?Sized), expected: &str);

            fn contains(container: impl ::vouch_value::ToValue, element: impl ::vouch_value::ToValue);
            fn not_contains(container: impl ::vouch_value::ToValue, element: impl ::vouch_value::ToValue);
            fn subset(list: impl ::vouch_value::ToValue, subset: impl ::vouch_value::ToValue);
            fn elements_match(list_a: impl ::vouch_value::ToValue, list_b: impl ::vouch_value::ToValue);

            fn greater(e1: impl ::vouch_value::ToValue, e2: impl ::vouch_value::ToValue);
            fn greater_or_equal(e1: impl ::vouch_value::ToValue, e2: impl ::vouch_value::ToValue);
            fn less(e1: impl ::vouch_value::ToValue, e2: impl ::vouch_value::ToValue);
            fn less_or_equal(e1: impl ::vouch_value::ToValue, e2: impl ::vouch_value::ToValue);
            fn is_increasing(object: impl ::vouch_value::ToValue);
            fn is_non_decreasing(object: impl ::vouch_value::ToValue);
            fn is_decreasing(object: impl ::vouch_value::ToValue);
            fn is_non_increasing(object: impl ::vouch_value::ToValue);

            fn panics(f: impl FnOnce());
            fn panics_with_value(expected: &str, f: impl FnOnce());
            fn not_panics(f: impl FnOnce());

            fn within_duration<M: $crate::Moment>(expected: M, actual: M, delta: ::std::time::Duration);

            fn eventually(
                condition: impl FnMut() -> bool + Send + 'static,
                wait_for: ::std::time::Duration,
                tick: ::std::time::Duration,
            );
            fn never(
                condition: impl FnMut() -> bool + Send + 'static,
                wait_for: ::std::time::Duration,
                tick: ::std::time::Duration,
            );
            fn eventually_with_t(
                condition: impl FnMut(&$crate::CollectT) + Send + 'static,
                wait_for: ::std::time::Duration,
                tick: ::std::time::Duration,
            );

            fn condition(comp: impl FnOnce() -> bool);
            fn fail(failure: &str);
        }
    };
}
