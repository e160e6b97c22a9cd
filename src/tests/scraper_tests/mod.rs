mod fallback_tests;
mod fetcher_tests;
