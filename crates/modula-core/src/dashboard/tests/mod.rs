mod entries_tests;
mod model_tests;
