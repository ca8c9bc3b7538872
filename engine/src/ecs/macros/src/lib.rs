mod component;

use proc_macro::TokenStream;

/// Derive `rusty_ecs::ecs::Component` for a type.
///
/// Add `#[component(clone)]` to let `Container::copy` duplicate the component through its
/// `Clone` implementation. Without it the type is treated as uncopyable.
#[proc_macro_derive(Component, attributes(component))]
pub fn derive_component(item: TokenStream) -> TokenStream {
    component::derive_component(item)
}
