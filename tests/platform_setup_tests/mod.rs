pub mod adapter_tests;
