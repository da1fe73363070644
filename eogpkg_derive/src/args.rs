use proc_macro2::TokenStream as TokenStream2;
use syn::{
	Token,
	parse::{Parse, ParseStream, Result},
};

/// Arguments of `#[context(...)]`: an optional leading `move,` followed by `format!` arguments.
#[derive(Debug)]
pub struct ContextArgs {
	pub capture: Option<Token![move]>,
	pub message: TokenStream2,
}

impl Parse for ContextArgs {
	fn parse(input: ParseStream<'_>) -> Result<Self> {
		let capture = if input.peek(Token![move]) {
			let token = input.parse::<Token![move]>()?;
			input.parse::<Token![,]>()?;
			Some(token)
		} else {
			None
		};
		if input.is_empty() {
			return Err(input.error("#[context] expects a format string"));
		}
		Ok(ContextArgs {
			capture,
			message: input.parse()?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::ContextArgs;
	use syn::parse_str;

	#[test]
	fn plain_message() {
		let args: ContextArgs = parse_str("\"opening {}\", path").unwrap();
		assert!(args.capture.is_none());
		assert!(args.message.to_string().starts_with("\"opening {}\""));
		assert!(args.message.to_string().ends_with("path"));
	}

	#[test]
	fn message_with_move() {
		let args: ContextArgs = parse_str("move, \"tile {coord:?}\"").unwrap();
		assert!(args.capture.is_some());
		assert_eq!(args.message.to_string(), "\"tile {coord:?}\"");
	}

	#[test]
	fn move_requires_comma() {
		assert!(parse_str::<ContextArgs>("move \"x\"").is_err());
	}

	#[test]
	fn empty_is_rejected() {
		let err = parse_str::<ContextArgs>("").unwrap_err();
		assert!(err.to_string().ends_with("#[context] expects a format string"), "{err}");
	}
}
