//! Procedural macros shared by the eogpkg crates.
//!
//! The only macro is [`macro@context`], which wraps the body of a function returning
//! `anyhow::Result` and attaches a formatted message to every error leaving it:
//!
//! ```ignore
//! #[context("reading tile {coord:?} from '{}'", self.path.display())]
//! pub fn get_tile_data(&self, coord: &TileCoord) -> Result<Tensor> { ... }
//! ```
//!
//! The message is formatted lazily, only when an error is actually returned.

mod args;

use args::ContextArgs;
use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use quote::{ToTokens, quote};
use syn::{ItemFn, ReturnType, parse_macro_input};

#[proc_macro_attribute]
pub fn context(args: TokenStream, input: TokenStream) -> TokenStream {
	let args = parse_macro_input!(args as ContextArgs);
	let mut function = parse_macro_input!(input as ItemFn);

	let output_type = match &function.sig.output {
		ReturnType::Type(_, ty) => ty.clone(),
		ReturnType::Default => {
			return syn::Error::new_spanned(&function.sig, "#[context] requires a function returning Result")
				.to_compile_error()
				.into();
		}
	};

	if let Some(asyncness) = &function.sig.asyncness {
		return syn::Error::new_spanned(asyncness, "#[context] only supports synchronous functions")
			.to_compile_error()
			.into();
	}

	let wrapped = wrap_sync(&function.block, &output_type, &args);

	function.block.stmts = vec![syn::Stmt::Expr(syn::Expr::Verbatim(wrapped), None)];
	function.into_token_stream().into()
}

fn map_err(args: &ContextArgs) -> TokenStream2 {
	let error = Ident::new("error", Span::mixed_site());
	let message = &args.message;
	quote! {
		.map_err(|#error| #error.context(format!(#message)).into())
	}
}

fn wrap_sync(body: &syn::Block, output_type: &syn::Type, args: &ContextArgs) -> TokenStream2 {
	let capture = &args.capture;
	let once = Ident::new("once", Span::mixed_site());
	let map_err = map_err(args);
	quote! {
		// Moving a non-`Copy` value in makes the closure `FnOnce`, so the body may move out of captures.
		let #once = ::core::iter::empty::<()>();
		(#capture || -> #output_type {
			::core::mem::drop(#once);
			#body
		})()#map_err
	}
}
