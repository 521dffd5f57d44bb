mod list_tests;
