/// Evaluates the block and returns its result together with the elapsed wall-clock
/// time as a `jiff::SignedDuration`.
#[macro_export]
macro_rules! timed {
    ($block:expr) => {{
        let started_at = jiff::Timestamp::now();
        let result = $block;
        (result, jiff::Timestamp::now().duration_since(started_at))
    }};
}

#[macro_export]
macro_rules! timer_debug {
    ($msg:literal,$block:expr) => {{
        let (result, elapsed) = $crate::timed!($block);

        tracing::debug!("{}: Took {:?}", $msg, elapsed);

        result
    }};
}
