use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};
use syn::{
    Attribute, Data, DeriveInput, Field, Fields, GenericArgument, Ident, PathArguments, Type,
    Variant,
};

const CONTEXT_FIELD: &str = "context";
const INTERNAL_VARIANT: &str = "Internal";

struct ErrorVariant<'a> {
    ident: &'a Ident,
    source: Option<(&'a Ident, &'a Type)>,
    has_context: bool,
    cfg: Vec<&'a Attribute>,
}

impl<'a> ErrorVariant<'a> {
    fn parse(variant: &'a Variant) -> syn::Result<Self> {
        let Fields::Named(fields) = &variant.fields else {
            return Err(syn::Error::new_spanned(
                variant,
                "devents_error requires named fields so source and context can be wired",
            ));
        };

        let context = fields.named.iter().find(|f| f.ident.as_ref().is_some_and(|i| i == CONTEXT_FIELD));
        let has_context = match context {
            Some(field) if is_context_type(&field.ty) => true,
            Some(field) => {
                return Err(syn::Error::new_spanned(
                    &field.ty,
                    "context field must be Option<Cow<'static, str>>",
                ));
            },
            None => false,
        };

        let source = fields
            .named
            .iter()
            .find(|f| is_source_field(f))
            .and_then(|f| f.ident.as_ref().map(|ident| (ident, &f.ty)));

        let cfg = variant.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).collect();

        Ok(Self { ident: &variant.ident, source, has_context, cfg })
    }
}

pub(crate) fn expand(input: DeriveInput) -> TokenStream {
    expand_enum(&input).unwrap_or_else(syn::Error::into_compile_error)
}

fn expand_enum(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "devents_error can only be applied to enums",
        ));
    };

    let variants =
        data.variants.iter().map(ErrorVariant::parse).collect::<syn::Result<Vec<_>>>()?;

    if let Some(orphan) = variants.iter().find(|v| v.source.is_some() && !v.has_context) {
        return Err(syn::Error::new_spanned(
            orphan.ident,
            "devents_error requires `context: Option<Cow<'static, str>>` on variants with a source",
        ));
    }

    let name = &input.ident;
    let ext = format_ident!("{name}Ext");
    let derives = missing_derives(input);
    let ext_trait = context_trait(name, &ext, &variants);
    let conversions = variants.iter().filter_map(|v| source_conversion(name, &ext, v));
    let internal = internal_conversions(name, &variants);

    Ok(quote! {
        #[allow(non_shorthand_field_patterns)]
        #derives
        #input

        #ext_trait
        #(#conversions)*
        #internal

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| std::borrow::Cow::Owned(format!(" ({c})")))
        }
    })
}

fn missing_derives(input: &DeriveInput) -> TokenStream {
    let present = derived_traits(&input.attrs);
    let mut wanted = Vec::with_capacity(2);
    if !present.contains("Debug") {
        wanted.push(quote! { Debug });
    }
    if !present.contains("Error") {
        wanted.push(quote! { ::thiserror::Error });
    }
    if wanted.is_empty() {
        return quote! {};
    }
    quote! { #[derive(#(#wanted),*)] }
}

fn context_trait(name: &Ident, ext: &Ident, variants: &[ErrorVariant<'_>]) -> TokenStream {
    let arms = variants.iter().filter(|v| v.has_context).map(|v| {
        let cfg = &v.cfg;
        let ident = v.ident;
        quote! { #(#cfg)* #name::#ident { context: slot, .. } => *slot = Some(context.into()), }
    });

    quote! {
        pub trait #ext<T> {
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext<T> for Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut err| {
                    match &mut err {
                        #(#arms)*
                        _ => {}
                    }
                    err
                })
            }
        }
    }
}

fn source_conversion(name: &Ident, ext: &Ident, v: &ErrorVariant<'_>) -> Option<TokenStream> {
    if v.ident == INTERNAL_VARIANT {
        return None;
    }
    let (field, ty) = v.source?;
    let ident = v.ident;
    let cfg = &v.cfg;

    Some(quote! {
        #(#cfg)*
        #[automatically_derived]
        impl From<#ty> for #name {
            #[inline]
            fn from(#field: #ty) -> Self { Self::#ident { #field, context: None } }
        }

        #(#cfg)*
        impl<T> #ext<T> for std::result::Result<T, #ty> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                self.map_err(|#field| #name::#ident { #field, context: Some(context.into()) })
            }
        }
    })
}

fn internal_conversions(name: &Ident, variants: &[ErrorVariant<'_>]) -> TokenStream {
    let Some(internal) = variants.iter().find(|v| v.ident == INTERNAL_VARIANT) else {
        return quote! {};
    };
    let cfg = &internal.cfg;

    quote! {
        #(#cfg)*
        impl From<&'static str> for #name {
            #[inline]
            fn from(s: &'static str) -> Self { Self::Internal { message: std::borrow::Cow::Borrowed(s), context: None } }
        }
        #(#cfg)*
        impl From<String> for #name {
            #[inline]
            fn from(s: String) -> Self { Self::Internal { message: std::borrow::Cow::Owned(s), context: None } }
        }
    }
}

fn is_source_field(field: &Field) -> bool {
    field.ident.as_ref().is_some_and(|ident| ident == "source")
        || field.attrs.iter().any(|attr| attr.path().is_ident("source") || attr.path().is_ident("from"))
}

fn derived_traits(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                traits.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }
    traits
}

/// Accepts `Option<Cow<'static, str>>` with any leading path on either type.
fn is_context_type(ty: &Type) -> bool {
    let Some(Type::Path(inner)) = single_generic(ty, "Option") else {
        return false;
    };
    let Some(cow) = inner.path.segments.last() else {
        return false;
    };
    cow.ident == "Cow" && compact(cow) == "Cow<'static,str>"
}

fn single_generic<'t>(ty: &'t Type, wrapper: &str) -> Option<&'t Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn compact(tokens: &impl ToTokens) -> String {
    tokens.to_token_stream().to_string().chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn render(input: DeriveInput) -> String {
        expand(input).to_string()
    }

    #[test]
    fn rejects_structs() {
        let out = render(parse_quote! { pub struct NotAnEnum { message: String } });
        assert!(out.contains("compile_error"));
        assert!(out.contains("only be applied to enums"));
    }

    #[test]
    fn rejects_tuple_variants() {
        let out = render(parse_quote! {
            pub enum Demo { Io(std::io::Error) }
        });
        assert!(out.contains("requires named fields"));
    }

    #[test]
    fn rejects_source_without_context() {
        let out = render(parse_quote! {
            pub enum Demo { Io { source: std::io::Error } }
        });
        assert!(out.contains("on variants with a source"));
    }

    #[test]
    fn rejects_wrong_context_type() {
        let out = render(parse_quote! {
            pub enum Demo { Io { source: std::io::Error, context: Option<String> } }
        });
        assert!(out.contains("context field must be"));
    }

    #[test]
    fn generates_ext_trait_and_conversions() {
        let out = render(parse_quote! {
            pub enum StoreError {
                Io { source: std::io::Error, context: Option<std::borrow::Cow<'static, str>> },
                Internal { message: std::borrow::Cow<'static, str>, context: Option<Cow<'static, str>> },
            }
        });
        assert!(out.contains("trait StoreErrorExt"));
        assert!(out.contains("impl From < std :: io :: Error > for StoreError"));
        assert!(out.contains("impl From < & 'static str > for StoreError"));
        assert!(out.contains(":: thiserror :: Error"));
    }

    #[test]
    fn keeps_existing_derives() {
        let out = render(parse_quote! {
            #[derive(Debug)]
            pub enum Demo { Missing { context: Option<Cow<'static, str>> } }
        });
        assert_eq!(out.matches("Debug").count(), 1);
    }

    #[test]
    fn context_type_accepts_qualified_paths() {
        assert!(is_context_type(&parse_quote!(Option<Cow<'static, str>>)));
        assert!(is_context_type(&parse_quote!(std::option::Option<std::borrow::Cow<'static, str>>)));
        assert!(!is_context_type(&parse_quote!(Option<Cow<'a, str>>)));
        assert!(!is_context_type(&parse_quote!(Cow<'static, str>)));
    }
}
