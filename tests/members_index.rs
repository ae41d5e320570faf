//! Flattened member view tests: inheritance, mixin precedence, static
//! stripping, hide removal and cache behavior.

mod common;

use classdoc::members::MembersIndex;

// ─── Inheritance ────────────────────────────────────────────────────

#[test]
fn child_inherits_parent_members_but_not_plain_statics() {
    let (reg, diags) = common::build_registry(&[
        (
            "base.js",
            "/**
 * @class My.Base
 */
Ext.define('My.Base', {});
/**
 * Ping it.
 * @method ping
 */
ping: function() {}
/**
 * @method make
 * @static
 */
make: function() {}",
        ),
        (
            "child.js",
            "/**
 * @class My.Child
 * @extends My.Base
 */
Ext.define('My.Child', {});",
        ),
    ]);
    let index = MembersIndex::new(&reg, &diags);
    let flat = index.global_by_id("My.Child");
    assert!(flat.contains("method-ping"));
    assert!(!flat.contains("static-method-make"));
    assert_eq!(flat.get("method-ping").unwrap().owner, "My.Base");
}

#[test]
fn inheritable_statics_do_inherit() {
    let (reg, diags) = common::build_registry(&[(
        "app.js",
        "/**
 * @class
 */
Ext.define('My.Base', {
    inheritableStatics: { flavor: 'plain' },
    statics: { create: function() {} }
});
/**
 * @class My.Child
 * @extends My.Base
 */
Ext.define('My.Child', {});",
    )]);
    let index = MembersIndex::new(&reg, &diags);
    let flat = index.global_by_id("My.Child");
    assert!(flat.contains("static-property-flavor"));
    assert!(!flat.contains("static-method-create"));
}

#[test]
fn own_member_shadows_the_inherited_one() {
    let (reg, diags) = common::build_registry(&[(
        "app.js",
        "/**
 * @class My.Base
 */
Ext.define('My.Base', {});
/**
 * Base ping.
 * @method ping
 */
ping: function() {}
/**
 * @class My.Child
 * @extends My.Base
 */
Ext.define('My.Child', {});
/**
 * Child ping.
 * @method ping
 */
ping: function() {}",
    )]);
    let index = MembersIndex::new(&reg, &diags);
    let flat = index.global_by_id("My.Child");
    let ping = flat.get("method-ping").unwrap();
    assert_eq!(ping.owner, "My.Child");
    assert_eq!(ping.doc, "Child ping.");
    assert_eq!(ping.overrides.len(), 1);
    assert_eq!(ping.overrides[0].owner, "My.Base");
}

#[test]
fn later_mixins_win_over_earlier_ones() {
    let (reg, diags) = common::build_registry(&[(
        "app.js",
        "/**
 * @class My.M1
 */
Ext.define('My.M1', {});
/**
 * From M1.
 * @method dup
 */
dup: function() {}
/**
 * @class My.M2
 */
Ext.define('My.M2', {});
/**
 * From M2.
 * @method dup
 */
dup: function() {}
/**
 * @class My.C
 * @mixins My.M1 My.M2
 */
Ext.define('My.C', {});",
    )]);
    let index = MembersIndex::new(&reg, &diags);
    let flat = index.global_by_id("My.C");
    let dup = flat.get("method-dup").unwrap();
    assert_eq!(dup.owner, "My.M2");
    assert_eq!(dup.doc, "From M2.");
    assert_eq!(dup.overrides[0].owner, "My.M1");
}

// ─── Hiding ─────────────────────────────────────────────────────────

#[test]
fn hide_removes_the_inherited_member() {
    let (reg, diags) = common::build_registry(&[(
        "app.js",
        "/**
 * @class My.Base
 */
Ext.define('My.Base', {});
/**
 * @method ping
 */
ping: function() {}
/**
 * @class My.Child
 * @extends My.Base
 */
Ext.define('My.Child', {});
/**
 * @method ping
 * @hide
 */
ping: function() {}",
    )]);
    let index = MembersIndex::new(&reg, &diags);
    assert!(index.global_by_id("My.Base").contains("method-ping"));
    assert!(!index.global_by_id("My.Child").contains("method-ping"));
}

#[test]
fn hide_with_nothing_to_hide_warns() {
    let (reg, diags) = common::build_registry(&[(
        "app.js",
        "/**
 * @class My.C
 */
Ext.define('My.C', {});
/**
 * @method ghost
 * @hide
 */
ghost: function() {}",
    )]);
    let index = MembersIndex::new(&reg, &diags);
    index.global_by_id("My.C");
    assert!(common::has_warning(
        &diags,
        "@hide method-ghost: no inherited member to hide"
    ));
}

// ─── Caching ────────────────────────────────────────────────────────

#[test]
fn flattening_is_idempotent_without_mutation() {
    let (reg, diags) = common::build_registry(&[(
        "app.js",
        "/**
 * @class My.Base
 */
Ext.define('My.Base', {});
/**
 * @method ping
 */
ping: function() {}
/**
 * @class My.Child
 * @extends My.Base
 */
Ext.define('My.Child', {});",
    )]);
    let index = MembersIndex::new(&reg, &diags);
    let first = index.global_by_id("My.Child");
    let second = index.global_by_id("My.Child");
    assert_eq!(first, second);
}

#[test]
fn mutation_invalidates_cached_views() {
    let (mut reg, diags) = common::build_registry(&[(
        "app.js",
        "/**
 * @class My.Base
 */
Ext.define('My.Base', {});
/**
 * Old doc.
 * @method ping
 */
ping: function() {}
/**
 * @class My.Child
 * @extends My.Base
 */
Ext.define('My.Child', {});",
    )]);
    {
        let index = MembersIndex::new(&reg, &diags);
        assert_eq!(
            index.global_by_id("My.Child").get("method-ping").unwrap().doc,
            "Old doc."
        );
    }
    // Editing the parent must be visible through the subclass's view.
    if let Some(base) = reg.get_mut("My.Base") {
        base.members[0].doc = "New doc.".to_string();
    }
    let index = MembersIndex::new(&reg, &diags);
    assert_eq!(
        index.global_by_id("My.Child").get("method-ping").unwrap().doc,
        "New doc."
    );
}

#[test]
fn grouping_by_name() {
    let (reg, diags) = common::build_registry(&[(
        "app.js",
        "/**
 * @class My.C
 */
Ext.define('My.C', {});
/**
 * @method load
 */
load: function() {}
/**
 * @cfg {String} load
 */",
    )]);
    let index = MembersIndex::new(&reg, &diags);
    let by_name = index.global_by_name("My.C");
    assert_eq!(by_name["load"].len(), 2);
}
