//! Authentication state trait and macro.

use crate::jwt::TokenCodec;

/// Trait for state types that provide a token codec for authentication.
pub trait HasTokenCodec {
    fn tokens(&self) -> &dyn TokenCodec;
}

/// Macro to implement `HasTokenCodec` for state structs with the standard field.
///
/// The struct must have a `tokens: Arc<dyn TokenCodec>` field.
///
/// # Example
/// ```ignore
/// use crate::impl_has_token_codec;
///
/// #[derive(Clone)]
/// pub struct MyState {
///     pub tokens: Arc<dyn TokenCodec>,
///     // ... other fields
/// }
///
/// impl_has_token_codec!(MyState);
/// ```
#[macro_export]
macro_rules! impl_has_token_codec {
    ($state_type:ty) => {
        impl $crate::auth::HasTokenCodec for $state_type {
            fn tokens(&self) -> &dyn $crate::jwt::TokenCodec {
                &*self.tokens
            }
        }
    };
}
