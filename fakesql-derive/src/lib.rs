use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

/// Implements `fakesql_core::Record` for a struct with named fields.
///
/// Fields are described in declaration order. `#[record(skip)]` leaves a field out and
/// `#[record(rename = "...")]` changes the column name.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    match expand_record(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_record(input: syn::DeriveInput) -> syn::Result<TokenStream2> {
    let syn::DeriveInput { ident, data, generics, .. } = input;

    let s = match data {
        syn::Data::Struct(s) => s,
        syn::Data::Enum(e) => {
            return Err(syn::Error::new(e.enum_token.span, "`Record` cannot be derived for enums"));
        }
        syn::Data::Union(u) => {
            return Err(syn::Error::new(u.union_token.span, "`Record` cannot be derived for unions"));
        }
    };

    let fields = match s.fields {
        syn::Fields::Named(fields) => fields.named,
        syn::Fields::Unnamed(_) | syn::Fields::Unit => {
            return Err(syn::Error::new_spanned(
                &ident,
                "`Record` can only be derived for structs with named fields",
            ));
        }
    };

    let mut descriptors = Vec::with_capacity(fields.len());
    for field in &fields {
        let attrs = FieldAttrs::parse(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let field_ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let name = attrs.rename.unwrap_or_else(|| field_ident.to_string());
        let ty = &field.ty;
        let visibility = match field.vis {
            syn::Visibility::Public(_) => quote!(::fakesql_core::Visibility::Public),
            _ => quote!(::fakesql_core::Visibility::NonPublic),
        };

        descriptors.push(quote! {
            ::fakesql_core::Field::new(
                #name,
                <#ty as ::fakesql_core::ValueType>::LOGICAL_TYPE,
                #visibility,
                |this: &Self| ::fakesql_core::Value::from(::core::clone::Clone::clone(&this.#field_ident)),
            )
        });
    }

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::fakesql_core::Record for #ident #ty_generics #where_clause {
            #[inline]
            fn describe_fields() -> ::std::vec::Vec<::fakesql_core::Field<Self>> {
                ::std::vec![
                    #(#descriptors,)*
                ]
            }
        }
    })
}

#[derive(Default)]
struct FieldAttrs {
    skip: bool,
    rename: Option<String>,
}

impl FieldAttrs {
    fn parse(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("record")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    this.skip = true;
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    let name: syn::LitStr = meta.value()?.parse()?;
                    this.rename = Some(name.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported `record` attribute, expected `skip` or `rename`"))
                }
            })?;
        }
        Ok(this)
    }
}
