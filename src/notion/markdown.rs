use crate::notion::types::{BlockKind, BlockNode, RichText};

/// Converts a fetched block tree into markdown text.
///
/// Top-level blocks are separated by a blank line, except consecutive list
/// items which stay adjacent so they form a single list. Children of a
/// block are rendered below it, indented one level.
pub fn blocks_to_markdown(blocks: &[BlockNode]) -> String {
    let mut parts: Vec<(bool, String)> = vec![];
    let mut ordinal = 0;

    for node in blocks {
        ordinal = match node.block.kind {
            BlockKind::NumberedListItem { .. } => ordinal + 1,
            _ => 0,
        };

        let Some(rendered) = render_block(node, ordinal) else {
            continue;
        };
        parts.push((is_list_item(&node.block.kind), rendered));
    }

    let mut out = String::new();
    for (i, (is_item, text)) in parts.iter().enumerate() {
        if i > 0 {
            let prev_was_item = parts[i - 1].0;
            if *is_item && prev_was_item {
                out.push('\n');
            } else {
                out.push_str("\n\n");
            }
        }
        out.push_str(text);
    }
    out
}

fn is_list_item(kind: &BlockKind) -> bool {
    matches!(
        kind,
        BlockKind::BulletedListItem { .. }
            | BlockKind::NumberedListItem { .. }
            | BlockKind::ToDo { .. }
    )
}

fn render_block(node: &BlockNode, ordinal: usize) -> Option<String> {
    let text = match &node.block.kind {
        BlockKind::Paragraph { paragraph } => {
            let text = inline_text(&paragraph.rich_text);
            if text.is_empty() {
                return None;
            }
            text
        }
        BlockKind::Heading1 { heading_1 } => format!("# {}", inline_text(&heading_1.rich_text)),
        BlockKind::Heading2 { heading_2 } => format!("## {}", inline_text(&heading_2.rich_text)),
        BlockKind::Heading3 { heading_3 } => format!("### {}", inline_text(&heading_3.rich_text)),
        BlockKind::BulletedListItem { bulleted_list_item } => {
            format!("- {}", inline_text(&bulleted_list_item.rich_text))
        }
        BlockKind::NumberedListItem { numbered_list_item } => {
            format!("{}. {}", ordinal, inline_text(&numbered_list_item.rich_text))
        }
        BlockKind::ToDo { to_do } => {
            let mark = if to_do.checked { "x" } else { " " };
            format!("- [{}] {}", mark, inline_text(&to_do.rich_text))
        }
        BlockKind::Quote { quote } => format!("> {}", inline_text(&quote.rich_text)),
        BlockKind::Callout { callout } => format!("> {}", inline_text(&callout.rich_text)),
        BlockKind::Toggle { toggle } => inline_text(&toggle.rich_text),
        BlockKind::Code { code } => {
            let language = match code.language.as_str() {
                "plain text" => "",
                other => other,
            };
            format!("```{}\n{}\n```", language, inline_text(&code.rich_text))
        }
        BlockKind::Image { image } => {
            format!("![{}]({})", inline_text(&image.caption), image.url())
        }
        BlockKind::Bookmark { bookmark } => {
            let label = match inline_text(&bookmark.caption) {
                caption if caption.is_empty() => bookmark.url.clone(),
                caption => caption,
            };
            format!("[{}]({})", label, bookmark.url)
        }
        BlockKind::Divider => "---".to_string(),
        BlockKind::Table => return render_table(node),
        // Rows are rendered by their parent table
        BlockKind::TableRow { .. } => return None,
        BlockKind::Unsupported => return None,
    };

    if node.children.is_empty() {
        return Some(text);
    }

    let children = blocks_to_markdown(&node.children);
    if children.is_empty() {
        return Some(text);
    }

    Some(format!("{}\n{}", text, indent_lines(&children)))
}

fn render_table(node: &BlockNode) -> Option<String> {
    let rows: Vec<Vec<String>> = node
        .children
        .iter()
        .filter_map(|child| match &child.block.kind {
            BlockKind::TableRow { table_row } => {
                Some(table_row.cells.iter().map(|cell| inline_text(cell)).collect())
            }
            _ => None,
        })
        .collect();

    let first = rows.first()?;
    let mut lines = vec![format_row(first), format!("|{}", " --- |".repeat(first.len()))];
    for row in &rows[1..] {
        lines.push(format_row(row));
    }
    Some(lines.join("\n"))
}

fn format_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

fn indent_lines(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                line.to_string()
            } else {
                format!("  {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders one rich-text run, applying annotations inside out and the
/// link last.
pub fn inline_text(items: &[RichText]) -> String {
    items.iter().map(decorate).collect()
}

fn decorate(item: &RichText) -> String {
    let mut text = item.plain_text.clone();
    if text.trim().is_empty() {
        return text;
    }

    if item.annotations.code {
        text = format!("`{}`", text);
    }
    if item.annotations.bold {
        text = format!("**{}**", text);
    }
    if item.annotations.italic {
        text = format!("_{}_", text);
    }
    if item.annotations.strikethrough {
        text = format!("~~{}~~", text);
    }
    if let Some(href) = &item.href {
        text = format!("[{}]({})", text, href);
    }
    text
}
