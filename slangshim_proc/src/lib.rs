use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    Attribute, Ident, Result, Token, Type, braced, parenthesized,
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
};

/// How a declared method is surfaced
#[derive(Clone, Debug, PartialEq, Eq)]
enum Handler {
    /// Vtable slot only - reserves the position, nothing exported
    Slot,
    /// Exported thunk; an invalid receiver yields the return type's sentinel
    Export,
    /// Exported thunk returning a status code; an invalid receiver yields
    /// SLANG_E_INVALID_HANDLE
    Status,
}

/// A single virtual method of the interface, in vtable order
struct Method {
    attrs: Vec<Attribute>,
    name: Ident,
    args: Vec<(Ident, Type)>,
    ret: Option<Type>,
    handler: Handler,
}

/// The full slang_interface input
struct InterfaceDecl {
    attrs: Vec<Attribute>,
    name: Ident,
    parent: Option<Ident>,
    family: Ident,
    vtable_type: Ident,
    methods: Vec<Method>,
}

impl Parse for Method {
    fn parse(input: ParseStream) -> Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;

        // fn name(args) [-> RetType] [=> handler];
        input.parse::<Token![fn]>()?;
        let name: Ident = input.parse()?;

        let args_content;
        parenthesized!(args_content in input);
        let args_parsed: Punctuated<(Ident, Type), Token![,]> = args_content.parse_terminated(
            |input| {
                let name: Ident = input.parse()?;
                input.parse::<Token![:]>()?;
                let ty: Type = input.parse()?;
                Ok((name, ty))
            },
            Token![,],
        )?;
        let args: Vec<_> = args_parsed.into_iter().collect();

        let ret = if input.peek(Token![->]) {
            input.parse::<Token![->]>()?;
            Some(input.parse::<Type>()?)
        } else {
            None
        };

        let handler = if input.peek(Token![=>]) {
            input.parse::<Token![=>]>()?;
            let handler_name: Ident = input.parse()?;
            match handler_name.to_string().as_str() {
                "export" => Handler::Export,
                "status" => Handler::Status,
                other => {
                    return Err(syn::Error::new(
                        handler_name.span(),
                        format!("unknown handler: {}", other),
                    ));
                }
            }
        } else {
            Handler::Slot
        };

        input.parse::<Token![;]>()?;

        Ok(Method {
            attrs,
            name,
            args,
            ret,
            handler,
        })
    }
}

impl Parse for InterfaceDecl {
    fn parse(input: ParseStream) -> Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;

        // IName [: IParent] as Family
        let name: Ident = input.parse()?;
        let parent = if input.peek(Token![:]) {
            input.parse::<Token![:]>()?;
            Some(input.parse::<Ident>()?)
        } else {
            None
        };
        input.parse::<Token![as]>()?;
        let family: Ident = input.parse()?;

        let content;
        braced!(content in input);

        // vtable: VtableType,
        let vtable_kw: Ident = content.parse()?;
        if vtable_kw != "vtable" {
            return Err(syn::Error::new(vtable_kw.span(), "expected `vtable`"));
        }
        content.parse::<Token![:]>()?;
        let vtable_type: Ident = content.parse()?;
        content.parse::<Token![,]>()?;

        let mut methods = Vec::new();
        while !content.is_empty() {
            methods.push(content.parse::<Method>()?);
        }

        Ok(InterfaceDecl {
            attrs,
            name,
            parent,
            family,
            vtable_type,
            methods,
        })
    }
}

/// `<Family>_<method>`, the stable exported symbol name
fn export_name(family: &Ident, method: &Ident) -> Ident {
    format_ident!("{}_{}", family, method)
}

fn ret_type(method: &Method) -> TokenStream2 {
    match &method.ret {
        Some(ty) => quote! { #ty },
        None => quote! { () },
    }
}

fn generate_vtable_field(iface: &Ident, method: &Method) -> TokenStream2 {
    let method_name = &method.name;
    let ret = ret_type(method);
    let arg_types: Vec<_> = method.args.iter().map(|(_, ty)| ty).collect();
    let attrs = if method.handler == Handler::Slot {
        method.attrs.as_slice()
    } else {
        &[]
    };

    quote! {
        #(#attrs)*
        pub #method_name: unsafe extern "system" fn(*mut #iface #(, #arg_types)*) -> #ret
    }
}

fn generate_thunk(decl: &InterfaceDecl, method: &Method) -> TokenStream2 {
    let iface = &decl.name;
    let method_name = &method.name;
    let export = export_name(&decl.family, method_name);
    let export_str = export.to_string();
    let ret = ret_type(method);
    let attrs = &method.attrs;

    let arg_names: Vec<_> = method.args.iter().map(|(name, _)| name).collect();
    let arg_types: Vec<_> = method.args.iter().map(|(_, ty)| ty).collect();

    let invalid = match method.handler {
        Handler::Status => quote! { crate::result::SLANG_E_INVALID_HANDLE },
        _ => quote! { <#ret as crate::handle::Sentinel>::sentinel() },
    };

    quote! {
        #(#attrs)*
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn #export(
            this: *mut *mut #iface
            #(, #arg_names: #arg_types)*
        ) -> #ret {
            unsafe {
                let Some(obj) = crate::handle::receiver(this, #export_str) else {
                    return #invalid;
                };
                debug_log!(concat!("[", #export_str, "] this={:?}"), obj);
                ((*(*obj).vtable).#method_name)(obj #(, #arg_names)*)
            }
        }
    }
}

fn expand(decl: &InterfaceDecl) -> TokenStream2 {
    let attrs = &decl.attrs;
    let iface = &decl.name;
    let vtable_type = &decl.vtable_type;
    let family_str = decl.family.to_string();

    let base_field = decl.parent.as_ref().map(|parent| {
        let parent_vtable = format_ident!("{}Vtbl", parent);
        quote! { pub base: #parent_vtable, }
    });

    let inherits = decl.parent.as_ref().map(|parent| {
        quote! {
            unsafe impl crate::handle::Inherits<#parent> for #iface {}
        }
    });

    let vtable_fields: Vec<_> = decl
        .methods
        .iter()
        .map(|m| generate_vtable_field(iface, m))
        .collect();

    let thunks: Vec<_> = decl
        .methods
        .iter()
        .filter(|m| m.handler != Handler::Slot)
        .map(|m| generate_thunk(decl, m))
        .collect();

    quote! {
        #(#attrs)*
        #[repr(C)]
        pub struct #iface {
            pub vtable: *const #vtable_type,
        }

        #[repr(C)]
        pub struct #vtable_type {
            #base_field
            #(#vtable_fields),*
        }

        unsafe impl crate::handle::ComInterface for #iface {
            const FAMILY: &'static str = #family_str;
        }

        #inherits

        #(#thunks)*
    }
}

/// Declares a reference-counted Slang interface and its flat exports.
///
/// ```text
/// IModule: IComponentType as Module {
///     vtable: IModuleVtbl,
///     fn getDefinedEntryPointCount() -> i32 => export;
///     fn serialize(out: *mut *mut ISlangBlob) -> SlangResult;
/// }
/// ```
///
/// Methods must be listed in vtable order. The parent's vtable is embedded
/// as the first field, so the parent must be declared with a `<Parent>Vtbl`
/// vtable type.
#[proc_macro]
pub fn slang_interface(input: TokenStream) -> TokenStream {
    let decl = parse_macro_input!(input as InterfaceDecl);
    TokenStream::from(expand(&decl))
}
