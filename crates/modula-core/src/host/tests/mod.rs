mod autoload_tests;
mod router_tests;
mod locale_tests;
