use std::collections::HashMap;

use serde::Deserialize;

/// One page of results from a database query. The caller follows
/// `next_cursor` until `has_more` turns false.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<RecordStub>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Summary entry of a query result. Only the id is consumed; the full
/// record is retrieved separately.
#[derive(Debug, Deserialize)]
pub struct RecordStub {
    pub id: String,
}

/// A page object: property metadata for one record. The block-tree body
/// is fetched through the block-children endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PageObject {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title { title: Vec<RichText> },
    RichText { rich_text: Vec<RichText> },
    Url { url: Option<String> },
    Date { date: Option<DateValue> },
    People { people: Vec<Person> },
    MultiSelect { multi_select: Vec<SelectOption> },
    Select { select: Option<SelectOption> },
    Status { status: Option<SelectOption> },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateValue {
    pub start: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

impl PageObject {
    fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn title_text(&self, name: &str) -> Option<String> {
        match self.property(name)? {
            PropertyValue::Title { title } => title.first().map(|t| t.plain_text.clone()),
            _ => None,
        }
    }

    pub fn rich_text(&self, name: &str) -> Option<String> {
        match self.property(name)? {
            PropertyValue::RichText { rich_text } => {
                rich_text.first().map(|t| t.plain_text.clone())
            }
            _ => None,
        }
    }

    pub fn url(&self, name: &str) -> Option<String> {
        match self.property(name)? {
            PropertyValue::Url { url } => url.clone(),
            _ => None,
        }
    }

    pub fn date_start(&self, name: &str) -> Option<String> {
        match self.property(name)? {
            PropertyValue::Date { date } => date.as_ref().map(|d| d.start.clone()),
            _ => None,
        }
    }

    pub fn person_name(&self, name: &str) -> Option<String> {
        match self.property(name)? {
            PropertyValue::People { people } => people.first().and_then(|p| p.name.clone()),
            _ => None,
        }
    }

    pub fn select_name(&self, name: &str) -> Option<String> {
        match self.property(name)? {
            PropertyValue::Select { select } => select.as_ref().map(|s| s.name.clone()),
            _ => None,
        }
    }

    pub fn multi_select_names(&self, name: &str) -> Vec<String> {
        match self.property(name) {
            Some(PropertyValue::MultiSelect { multi_select }) => {
                multi_select.iter().map(|s| s.name.clone()).collect()
            }
            _ => vec![],
        }
    }
}

/// One page of block children. Blocks with `has_children` carry a nested
/// tree that is fetched recursively.
#[derive(Debug, Deserialize)]
pub struct BlockChildrenResponse {
    pub results: Vec<Block>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(default)]
    pub has_children: bool,
    #[serde(flatten)]
    pub kind: BlockKind,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph {
        paragraph: TextPayload,
    },
    #[serde(rename = "heading_1")]
    Heading1 {
        heading_1: TextPayload,
    },
    #[serde(rename = "heading_2")]
    Heading2 {
        heading_2: TextPayload,
    },
    #[serde(rename = "heading_3")]
    Heading3 {
        heading_3: TextPayload,
    },
    BulletedListItem {
        bulleted_list_item: TextPayload,
    },
    NumberedListItem {
        numbered_list_item: TextPayload,
    },
    Quote {
        quote: TextPayload,
    },
    Callout {
        callout: TextPayload,
    },
    Toggle {
        toggle: TextPayload,
    },
    ToDo {
        to_do: ToDoPayload,
    },
    Code {
        code: CodePayload,
    },
    Image {
        image: FilePayload,
    },
    Bookmark {
        bookmark: BookmarkPayload,
    },
    Divider,
    Table,
    TableRow {
        table_row: TableRowPayload,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextPayload {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToDoPayload {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub checked: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodePayload {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableRowPayload {
    pub cells: Vec<Vec<RichText>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilePayload {
    #[serde(default)]
    pub caption: Vec<RichText>,
    #[serde(flatten)]
    pub source: FileSource,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileSource {
    External { external: FileLink },
    File { file: FileLink },
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileLink {
    pub url: String,
}

impl FilePayload {
    pub fn url(&self) -> &str {
        match &self.source {
            FileSource::External { external } => &external.url,
            FileSource::File { file } => &file.url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookmarkPayload {
    pub url: String,
    #[serde(default)]
    pub caption: Vec<RichText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RichText {
    pub plain_text: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub annotations: Annotations,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub code: bool,
}

/// A block together with its fetched children.
#[derive(Debug, Clone)]
pub struct BlockNode {
    pub block: Block,
    pub children: Vec<BlockNode>,
}
