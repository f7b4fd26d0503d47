//! Procedural macros for the tandem runtime.
//!
//! - `#[tandem::main]` runs `async fn main` on a fresh runtime,
//! - `#[tandem::test]` does the same for an `async` test,
//! - `tandem::join!` awaits several futures concurrently.

mod args;

use args::MainArgs;

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Error, Expr, ItemFn, Token, parse_macro_input};

/// Rejects anything that is not an `async fn` without parameters.
fn check_async_fn(function: &ItemFn, attribute: &str) -> syn::Result<()> {
    let sig = &function.sig;

    if sig.asyncness.is_none() {
        return Err(Error::new_spanned(
            sig.fn_token,
            format!("#[{attribute}] must be used on an async function"),
        ));
    }

    if !sig.inputs.is_empty() {
        return Err(Error::new_spanned(
            &sig.inputs,
            format!("#[{attribute}] functions cannot take arguments"),
        ));
    }

    Ok(())
}

/// Runs `async fn main` to completion on a tandem runtime.
///
/// The body's value becomes `main`'s return value, so `main` may return
/// `()`, a `Result`, or an `ExitCode`.
///
/// ```rust,ignore
/// #[tandem::main(worker_threads = 2)]
/// async fn main() {
///     tandem::time::sleep(Duration::from_millis(10)).await;
/// }
/// ```
#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as MainArgs);
    let function = parse_macro_input!(item as ItemFn);

    if let Err(err) = check_async_fn(&function, "tandem::main") {
        return err.to_compile_error().into();
    }

    if function.sig.ident != "main" {
        return Error::new_spanned(&function.sig.ident, "#[tandem::main] must be used on fn main")
            .to_compile_error()
            .into();
    }

    let attrs = &function.attrs;
    let vis = &function.vis;
    let output = &function.sig.output;
    let block = &function.block;

    let worker_threads = args
        .worker_threads
        .map(|n| quote! { .worker_threads(#n) });

    quote! {
        #(#attrs)*
        #vis fn main() #output {
            ::tandem::RuntimeBuilder::new()
                #worker_threads
                .build()
                .expect("failed to build the tandem runtime")
                .block_on(async move #block)
        }
    }
    .into()
}

/// Turns an `async fn` into a `#[test]` that runs on its own runtime.
///
/// ```rust,ignore
/// #[tandem::test]
/// async fn sleeps() {
///     tandem::time::sleep(Duration::from_millis(1)).await;
/// }
/// ```
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return Error::new(
            proc_macro2::Span::call_site(),
            "#[tandem::test] takes no arguments",
        )
        .to_compile_error()
        .into();
    }

    let function = parse_macro_input!(item as ItemFn);

    if let Err(err) = check_async_fn(&function, "tandem::test") {
        return err.to_compile_error().into();
    }

    let attrs = &function.attrs;
    let vis = &function.vis;
    let name = &function.sig.ident;
    let output = &function.sig.output;
    let block = &function.block;

    quote! {
        #[::core::prelude::v1::test]
        #(#attrs)*
        #vis fn #name() #output {
            ::tandem::RuntimeBuilder::new()
                .build()
                .expect("failed to build the tandem runtime")
                .block_on(async move #block)
        }
    }
    .into()
}

/// Awaits every future concurrently inside the current task.
///
/// Resolves to a tuple of the outputs, in argument order, once all of
/// them are ready. A single future resolves to its bare output and an
/// empty invocation to `()`.
///
/// ```rust,ignore
/// let (a, b) = tandem::join!(async { 1 }, async { "two" });
/// ```
#[proc_macro]
pub fn join(input: TokenStream) -> TokenStream {
    let parser = Punctuated::<Expr, Token![,]>::parse_terminated;
    let futures = match parser.parse(input) {
        Ok(futures) => futures,
        Err(err) => return err.to_compile_error().into(),
    };

    let count = futures.len();

    if count == 0 {
        return quote! { () }.into();
    }

    if count == 1 {
        let future = &futures[0];
        return quote! { (#future).await }.into();
    }

    let pinned: Vec<_> = (0..count).map(|i| format_ident!("__tandem_future_{}", i)).collect();
    let outputs: Vec<_> = (0..count).map(|i| format_ident!("__tandem_output_{}", i)).collect();
    let futures = futures.iter();

    quote! {
        {
            #(
                let mut #pinned = ::std::boxed::Box::pin(#futures);
                let mut #outputs = ::core::option::Option::None;
            )*

            ::std::future::poll_fn(move |cx| {
                let mut pending = false;

                #(
                    if #outputs.is_none() {
                        match ::std::future::Future::poll(#pinned.as_mut(), cx) {
                            ::std::task::Poll::Ready(value) => #outputs = ::core::option::Option::Some(value),
                            ::std::task::Poll::Pending => pending = true,
                        }
                    }
                )*

                if pending {
                    return ::std::task::Poll::Pending;
                }

                ::std::task::Poll::Ready((
                    #(
                        match #outputs.take() {
                            ::core::option::Option::Some(value) => value,
                            ::core::option::Option::None => ::core::unreachable!(),
                        },
                    )*
                ))
            })
            .await
        }
    }
    .into()
}
