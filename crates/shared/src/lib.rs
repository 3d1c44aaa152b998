pub mod casper;
