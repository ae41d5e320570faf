//! Legacy class-comment splitting.
//!
//! Old-style code documents a whole class in one comment: class docs,
//! then a run of `@cfg` blocks, then `@constructor` with its params.
//! Before merging, such a comment is split into a class-tag group plus
//! one tag group per member. A `@cfg` or `@constructor` opens a new
//! group and closes the previous one; `@alias` always belongs to the
//! class group no matter where it appears.

use crate::model::Tag;

/// Split a class comment's tags into the class group and the member
/// groups. Comments without `@cfg`/`@constructor` come back with an
/// empty group list.
pub fn split_class_tags(tags: Vec<Tag>) -> (Vec<Tag>, Vec<Vec<Tag>>) {
    let mut class_tags = Vec::new();
    let mut groups: Vec<Vec<Tag>> = Vec::new();

    for tag in tags {
        match &tag {
            Tag::Cfg { .. } | Tag::Constructor { .. } => groups.push(vec![tag]),
            Tag::Alias { .. } => class_tags.push(tag),
            _ => match groups.last_mut() {
                Some(group) => group.push(tag),
                None => class_tags.push(tag),
            },
        }
    }
    (class_tags, groups)
}
