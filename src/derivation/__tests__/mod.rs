mod analysis_test;
mod parsing_test;
