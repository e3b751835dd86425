//! Domain objects: lazily loaded models with a save/refresh/remove
//! lifecycle.
//!
//! `DomainObject` (in `object`) does the work. The typed wrappers add named
//! accessors over the data bag and navigation to related objects; they
//! deref to `DomainObject`, so `save`, `refresh`, `remove`, `on` and the raw
//! `get`/`set` are available on every one of them.

/// Declare a typed wrapper bound to one resource descriptor.
macro_rules! domain_object {
    ($(#[$meta:meta])* $name:ident => $descriptor:path) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name<'a> {
            inner: $crate::model::DomainObject<'a>,
        }

        impl<'a> $name<'a> {
            /// Unbound object; `save` creates it remotely.
            pub fn new(http: &'a $crate::http_client::HttpClient) -> Self {
                Self {
                    inner: $crate::model::DomainObject::new($crate::resource::ResourceApi::new(
                        http,
                        &$descriptor,
                    )),
                }
            }

            /// Fetch an existing object with the resource's eager-load
            /// parameters.
            pub fn load(http: &'a $crate::http_client::HttpClient, id: &str) -> $crate::error::Result<Self> {
                Ok(Self {
                    inner: $crate::model::DomainObject::load(
                        $crate::resource::ResourceApi::new(http, &$descriptor),
                        id,
                    )?,
                })
            }

            pub fn into_inner(self) -> $crate::model::DomainObject<'a> {
                self.inner
            }
        }

        impl<'a> std::ops::Deref for $name<'a> {
            type Target = $crate::model::DomainObject<'a>;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }

        impl<'a> std::ops::DerefMut for $name<'a> {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.inner
            }
        }
    };
}

pub(crate) use domain_object;

mod activity;
mod board;
mod card;
mod member;
mod object;

pub use activity::{Action, Notification, Token, Webhook};
pub use board::{Board, CardList};
pub use card::{Card, Checklist, Label};
pub use member::{Member, Organization};
pub use object::{DataBag, DomainObject, Hook, HookFn, Hooks, ObjectState};
