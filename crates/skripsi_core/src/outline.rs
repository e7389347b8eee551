//! crates/skripsi_core/src/outline.rs
//!
//! Normalization of model-generated outlines. The completion service is
//! asked for a JSON array of `{title, content, subbab[]}` objects; whatever
//! comes back (parsed items, raw unparseable text, or nothing usable) is
//! turned into a well-formed, contiguously ordered outline here, falling
//! back to the standard five-BAB skeleton when needed.

use serde::{Deserialize, Serialize};

use crate::domain::OutlineItem;

/// One outline entry as the model emits it, before normalization. All
/// fields are optional because the model does not always honor the schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawOutlineItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub subbab: Option<Vec<String>>,
}

/// What the outline-generation port hands back: either items the gateway
/// managed to parse, or the raw model text when JSON decoding failed.
#[derive(Debug, Clone)]
pub enum OutlineReply {
    Parsed(Vec<RawOutlineItem>),
    Raw(String),
}

/// Normalizes raw items into domain outline items: `bab-{n}` ids, 1-based
/// `order`, description from `content` or the joined `subbab` list.
pub fn normalize_outline(items: &[RawOutlineItem]) -> Vec<OutlineItem> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| OutlineItem {
            id: format!("bab-{}", index + 1),
            title: item
                .title
                .clone()
                .unwrap_or_else(|| format!("BAB {}", index + 1)),
            content: item
                .content
                .clone()
                .or_else(|| item.subbab.as_ref().map(|s| s.join(", ")))
                .unwrap_or_else(|| "Deskripsi bab".to_string()),
            order: index as u32 + 1,
        })
        .collect()
}

/// Normalizes a gateway reply. Raw text gets one more JSON parse attempt
/// (the upstream sometimes wraps valid JSON oddly enough that only the
/// caller-side retry succeeds); if that also fails, the hardcoded default
/// skeleton takes over. The result is never empty.
pub fn normalize_reply(reply: OutlineReply) -> Vec<OutlineItem> {
    let items = match reply {
        OutlineReply::Parsed(items) if !items.is_empty() => items,
        OutlineReply::Raw(text) => match serde_json::from_str::<Vec<RawOutlineItem>>(&text) {
            Ok(items) if !items.is_empty() => items,
            _ => default_outline(),
        },
        OutlineReply::Parsed(_) => default_outline(),
    };
    normalize_outline(&items)
}

/// The standard five-chapter Indonesian thesis skeleton, used whenever the
/// model response cannot be turned into an outline.
pub fn default_outline() -> Vec<RawOutlineItem> {
    fn raw(title: &str, content: &str, subbab: &[&str]) -> RawOutlineItem {
        RawOutlineItem {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
            subbab: Some(subbab.iter().map(|s| s.to_string()).collect()),
        }
    }

    vec![
        raw(
            "BAB 1: PENDAHULUAN",
            "Berisi latar belakang, rumusan masalah, tujuan penelitian, dan manfaat penelitian",
            &[
                "1.1 Latar Belakang",
                "1.2 Rumusan Masalah",
                "1.3 Tujuan Penelitian",
                "1.4 Manfaat Penelitian",
                "1.5 Batasan Masalah",
            ],
        ),
        raw(
            "BAB 2: TINJAUAN PUSTAKA",
            "Berisi landasan teori, penelitian terdahulu, dan kerangka konseptual",
            &[
                "2.1 Landasan Teori",
                "2.2 Penelitian Terdahulu",
                "2.3 Kerangka Konseptual",
                "2.4 Hipotesis Penelitian",
            ],
        ),
        raw(
            "BAB 3: METODE PENELITIAN",
            "Berisi jenis penelitian, populasi dan sampel, teknik pengumpulan data, dan analisis data",
            &[
                "3.1 Jenis Penelitian",
                "3.2 Populasi dan Sampel",
                "3.3 Teknik Pengumpulan Data",
                "3.4 Instrumen Penelitian",
                "3.5 Analisis Data",
            ],
        ),
        raw(
            "BAB 4: HASIL DAN PEMBAHASAN",
            "Berisi hasil penelitian, analisis data, dan pembahasan",
            &[
                "4.1 Hasil Penelitian",
                "4.2 Analisis Data",
                "4.3 Pembahasan",
                "4.4 Temuan Penelitian",
            ],
        ),
        raw(
            "BAB 5: PENUTUP",
            "Berisi kesimpulan, saran, dan keterbatasan penelitian",
            &["5.1 Kesimpulan", "5.2 Saran", "5.3 Keterbatasan Penelitian"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_raw_text_falls_back_to_five_chapter_skeleton() {
        let outline = normalize_reply(OutlineReply::Raw(
            "Maaf, saya tidak bisa membuat outline dalam format JSON.".to_string(),
        ));

        assert_eq!(outline.len(), 5);
        let orders: Vec<u32> = outline.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5]);
        assert_eq!(outline[0].title, "BAB 1: PENDAHULUAN");
        assert_eq!(outline[4].title, "BAB 5: PENUTUP");
    }

    #[test]
    fn raw_text_that_is_valid_json_still_parses() {
        let outline = normalize_reply(OutlineReply::Raw(
            r#"[{"title":"BAB 1: PENDAHULUAN","content":"Pengantar"}]"#.to_string(),
        ));
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].content, "Pengantar");
    }

    #[test]
    fn ids_and_orders_are_one_based_positions() {
        let items = vec![RawOutlineItem::default(), RawOutlineItem::default()];
        let outline = normalize_outline(&items);
        assert_eq!(outline[0].id, "bab-1");
        assert_eq!(outline[1].id, "bab-2");
        assert_eq!(outline[0].order, 1);
        assert_eq!(outline[1].order, 2);
    }

    #[test]
    fn missing_content_falls_back_to_joined_subbab() {
        let items = vec![RawOutlineItem {
            title: Some("BAB 1: PENDAHULUAN".to_string()),
            content: None,
            subbab: Some(vec!["1.1 Latar Belakang".into(), "1.2 Rumusan Masalah".into()]),
        }];
        let outline = normalize_outline(&items);
        assert_eq!(outline[0].content, "1.1 Latar Belakang, 1.2 Rumusan Masalah");
    }

    #[test]
    fn missing_everything_gets_placeholders() {
        let outline = normalize_outline(&[RawOutlineItem::default()]);
        assert_eq!(outline[0].title, "BAB 1");
        assert_eq!(outline[0].content, "Deskripsi bab");
    }

    #[test]
    fn empty_parsed_reply_also_falls_back() {
        let outline = normalize_reply(OutlineReply::Parsed(Vec::new()));
        assert_eq!(outline.len(), 5);
    }
}
