mod registrar_tests;
mod script_tests;
