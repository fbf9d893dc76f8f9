pub mod page_links;
pub mod url_parser;
