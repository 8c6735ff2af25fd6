//! Integration tests for Site-Mapper

mod crawl_tests;
