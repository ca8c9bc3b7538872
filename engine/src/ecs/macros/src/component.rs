use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, DeriveInput, parse_macro_input};

pub fn derive_component(input: TokenStream) -> TokenStream {
    // Parse the input tokens into a syntax tree
    let ast = parse_macro_input!(input as DeriveInput);

    let cloneable = match parse_options(&ast.attrs) {
        Ok(cloneable) => cloneable,
        Err(err) => return err.to_compile_error().into(),
    };

    // Get the type name we are annotating, generics included.
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let clone = cloneable.then(|| {
        quote! {
            const CLONE: ::core::option::Option<fn(&Self) -> Self> =
                ::core::option::Option::Some(<Self as ::core::clone::Clone>::clone);
        }
    });

    // Use ::rusty_ecs::ecs::Component which works both inside and outside the crate.
    // Inside the crate, this works because of `extern crate self as rusty_ecs;` in lib.rs
    // Outside the crate, this naturally resolves to the rusty_ecs dependency.
    TokenStream::from(quote! {
        impl #impl_generics ::rusty_ecs::ecs::Component for #name #ty_generics #where_clause {
            #clone
        }
    })
}

/// Read the `#[component(...)]` options. Only `clone` is understood.
fn parse_options(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut cloneable = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("component")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("clone") {
                cloneable = true;
                Ok(())
            } else {
                Err(meta.error("unsupported component option, expected `clone`"))
            }
        })?;
    }
    Ok(cloneable)
}
