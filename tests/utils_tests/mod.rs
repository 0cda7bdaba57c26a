pub mod installer_tests;
