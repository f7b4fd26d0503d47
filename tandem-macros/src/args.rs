use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Error, Expr, LitInt, MetaNameValue, Token};

/// Arguments accepted by `#[tandem::main(...)]`.
///
/// ```text
/// #[tandem::main]
/// #[tandem::main(worker_threads = 4)]
/// ```
#[derive(Default)]
pub(crate) struct MainArgs {
    pub(crate) worker_threads: Option<LitInt>,
}

impl Parse for MainArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = MainArgs::default();

        let pairs = Punctuated::<MetaNameValue, Token![,]>::parse_terminated(input)?;

        for pair in pairs {
            if !pair.path.is_ident("worker_threads") {
                return Err(Error::new_spanned(
                    &pair.path,
                    "unknown argument, expected `worker_threads`",
                ));
            }

            let Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Int(value),
                ..
            }) = &pair.value
            else {
                return Err(Error::new_spanned(
                    &pair.value,
                    "`worker_threads` must be an integer literal",
                ));
            };

            if value.base10_parse::<usize>()? == 0 {
                return Err(Error::new_spanned(value, "`worker_threads` must be > 0"));
            }

            if args.worker_threads.replace(value.clone()).is_some() {
                return Err(Error::new_spanned(
                    &pair.path,
                    "`worker_threads` given more than once",
                ));
            }
        }

        Ok(args)
    }
}
