mod config_tests;
mod provider_tests;
mod store_scenarios;
