//! Request-scoped logging across call layers.
//!
//! Run with `cargo run --example request_scoped`. Set `LOG_LEVEL=debug` to
//! see debug records, or `LOG_NO_COLOR=1` for plain output.

use ctxlog::{
    attrs, close_and_log_on_error, context_with_logger, context_with_request_id, log,
    new_request_id, request_id, with_log_options, with_log_sink, Context, JsonSink, Level,
    LogOptions, Logger, Output,
};
use std::io;
use std::sync::Arc;

fn main() {
    // Console output configured from the environment, plus a JSON copy on stderr.
    let root = Logger::new(
        Context::background(),
        [
            with_log_options(LogOptions::from_env()),
            with_log_sink(Arc::new(JsonSink::new(Output::Stderr, Level::Warn))),
        ],
    );
    let app = context_with_logger(&Context::background(), root.with_field("service", "orders"));

    for order in ["A-100", "A-101"] {
        let ctx = context_with_request_id(&app, new_request_id());
        handle_order(&ctx, order);
    }

    log(&app).info("shutting down", &[]);
}

fn handle_order(ctx: &Context, order: &str) {
    let logger = log(ctx)
        .with_field("request_id", request_id(ctx).unwrap_or("-"))
        .with_field("order", order);
    logger.info("order received", &[]);
    logger.debug("loading customer", &attrs!["cache" => "miss"]);

    let ctx = context_with_logger(ctx, logger);
    if order.ends_with('1') {
        log(&ctx).warn("payment slow", &attrs!["ms" => 1800]);
    }
    close_and_log_on_error(
        &ctx,
        || Err(io::Error::new(io::ErrorKind::BrokenPipe, "connection reset")),
        "releasing connection failed",
    );
}
