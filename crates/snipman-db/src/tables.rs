use redb::TableDefinition;

use snipman_core::HostContext;

/// Table holding one host's snippets.
/// Key: snippet id
/// Value: serialized Snippet as JSON bytes
pub type SnippetTable<'a> = TableDefinition<'a, &'static str, &'static [u8]>;

/// Name of the snippet table for a host, e.g. "ExcelSnippets".
pub fn snippet_table_name(host: &HostContext) -> String {
    host.store_namespace()
}

/// Table definition borrowing a previously computed table name.
pub fn snippet_table(name: &str) -> SnippetTable<'_> {
    TableDefinition::new(name)
}
