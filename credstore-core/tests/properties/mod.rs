mod codec_tests;
mod namespacing_tests;
mod secret_tests;
