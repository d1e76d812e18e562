use super::submission;
use crate::*;

fn ns() -> NameSource {
    NameSource::new("field")
}

fn plain_input() -> Formlet {
    input("text", Attributes::new())
}

#[test]
fn test_pure_consumes_no_names() {
    let instance = pure(Value::plain(1)).instantiate(&ns());
    assert_eq!(instance.name_source, ns());
    assert_eq!(instance.builder.build().unwrap(), Html::Nop);
    let value = instance.collector.collect(&Submission::new()).unwrap();
    assert_eq!(value.get().unwrap(), &Datum::Int(1));
}

#[test]
fn test_text_renders_and_collects_nothing() {
    let instance = text("Hello & welcome").instantiate(&ns());
    assert_eq!(instance.name_source, ns());
    assert!(instance.collector.is_nullary());
    assert_eq!(
        instance.builder.build().unwrap().to_string(),
        "Hello &amp; welcome"
    );
}

#[test]
fn test_input_draws_one_name() {
    let instance = plain_input().instantiate(&ns());
    assert_eq!(instance.name_source.drawn(), 1);
    assert!(matches!(&instance.collector, Collector::Field(name) if name == "field0"));
    assert_eq!(
        instance.builder.build().unwrap().to_string(),
        r#"<input type="text" name="field0"/>"#
    );
}

#[test]
fn test_combined_allocates_left_to_right() {
    let instance = plain_input().cmb(&plain_input()).instantiate(&ns());
    assert_eq!(instance.name_source.drawn(), 2);
    let html = instance.builder.build().unwrap();
    assert_eq!(html.first_field_name(), Some("field0"));
    assert_eq!(
        html.to_string(),
        r#"<input type="text" name="field0"/><input type="text" name="field1"/>"#
    );
}

#[test]
fn test_instantiate_is_repeatable() {
    let formlet = plain_input().cmb(&text(" and ")).cmb(&textarea_raw(Attributes::new()));
    let a = formlet.instantiate(&ns());
    let b = formlet.instantiate(&ns());
    assert_eq!(a.name_source, b.name_source);
    assert_eq!(a.builder.build().unwrap(), b.builder.build().unwrap());
}

#[test]
fn test_mapping_keeps_name_source() {
    let formlet = plain_input().map(Value::unary("len", |d| {
        Ok(Datum::Int(d.as_str().map(|s| s.len() as i64).unwrap_or(0)))
    }));
    let instance = formlet.instantiate(&ns());
    assert_eq!(instance.name_source.drawn(), 1);
    let value = instance
        .collector
        .collect(&submission(&[("field0", "four")]))
        .unwrap();
    assert_eq!(value.get().unwrap(), &Datum::Int(4));
}

#[test]
fn test_pure_function_applies_to_fields() {
    let greet = Value::binary("greet", |a, b| {
        Ok(format!("{} {}", a.as_str().unwrap_or(""), b.as_str().unwrap_or("")).into())
    });
    let formlet = pure(greet)
        .cmb(&text_input(None, Attributes::new()))
        .cmb(&text_input(None, Attributes::new()));
    let form = Form::new(&formlet, &ns());
    let processed = form
        .process(submission(&[("field0", "Hello"), ("field1", "World")]))
        .unwrap();
    assert_eq!(processed.value.get().unwrap(), &Datum::from("Hello World"));
    assert_eq!(processed.value.origins().len(), 2);
}

#[test]
fn test_text_input_default_and_sticky_value() {
    let form = Form::new(&text_input(Some("guest"), Attributes::new()), &ns());
    assert_eq!(
        form.render_blank().unwrap().to_string(),
        r#"<input type="text" name="field0" value="guest"/>"#
    );
    let processed = form.process(submission(&[("field0", "ann")])).unwrap();
    assert_eq!(
        processed.html.to_string(),
        r#"<input type="text" name="field0" value="ann"/>"#
    );
}

#[test]
fn test_textarea_sticky_content() {
    let form = Form::new(&textarea(None, Attributes::new().with_attr("rows", "3")), &ns());
    assert_eq!(
        form.render_blank().unwrap().to_string(),
        r#"<textarea rows="3" name="field0"></textarea>"#
    );
    let processed = form.process(submission(&[("field0", "a <b>")])).unwrap();
    assert_eq!(
        processed.html.to_string(),
        r#"<textarea rows="3" name="field0">a &lt;b&gt;</textarea>"#
    );
    assert_eq!(processed.value.get().unwrap(), &Datum::from("a <b>"));
}

#[test]
fn test_checkbox_default_and_presence() {
    let form = Form::new(&checkbox(true, Attributes::new()), &ns());
    assert_eq!(
        form.render_blank().unwrap().to_string(),
        r#"<input type="checkbox" name="field0" checked="checked"/>"#
    );

    let processed = form.process(Submission::new()).unwrap();
    assert_eq!(processed.value.get().unwrap(), &Datum::Bool(false));
    assert_eq!(
        processed.html.to_string(),
        r#"<input type="checkbox" name="field0"/>"#
    );

    let processed = form.process(submission(&[("field0", "on")])).unwrap();
    assert_eq!(processed.value.get().unwrap(), &Datum::Bool(true));
    assert!(processed.html.to_string().contains("checked"));
}

#[test]
fn test_submit_collects_only_when_asked() {
    let silent = submit("Send", Attributes::new(), false).instantiate(&ns());
    assert!(silent.collector.is_nullary());
    assert_eq!(
        silent.builder.build().unwrap().to_string(),
        r#"<input value="Send" type="submit" name="field0"/>"#
    );

    let pressed = submit("Send", Attributes::new(), true).instantiate(&ns());
    let value = pressed
        .collector
        .collect(&submission(&[("field0", "Send")]))
        .unwrap();
    assert_eq!(value.get().unwrap(), &Datum::Bool(true));
}

#[test]
fn test_nullary_sides_do_not_change_the_result() {
    let formlet = text("Name: ")
        .cmb(&text_input(None, Attributes::new()))
        .cmb(&submit("Send", Attributes::new(), false));
    let form = Form::new(&formlet, &ns());
    let processed = form.process(submission(&[("field0", "x")])).unwrap();
    assert_eq!(processed.value.get().unwrap(), &Datum::from("x"));
}

#[test]
fn test_replace_collector() {
    let formlet = plain_input().replace_collector(Collector::constant(Value::plain("fixed")));
    let instance = formlet.instantiate(&ns());
    assert_eq!(instance.name_source.drawn(), 1);
    let value = instance.collector.collect(&Submission::new()).unwrap();
    assert_eq!(value.get().unwrap(), &Datum::from("fixed"));
}

#[test]
fn test_with_label() {
    let formlet = with_label("Name", &text_input(None, Attributes::new()));
    let html = formlet.instantiate(&ns()).builder.build().unwrap();
    insta::assert_snapshot!(html.to_string(), @r#"<label for="field0">Name</label><input type="text" name="field0" id="field0"/>"#);
}

#[test]
fn test_with_label_requires_named_field() {
    let formlet = with_label("Nothing", &text("just text"));
    let err = formlet.instantiate(&ns()).builder.build().unwrap_err();
    assert!(matches!(err, FormletError::Precondition { .. }));

    let formlet = with_errors(&pure(Value::plain(1)));
    let err = formlet.instantiate(&ns()).builder.build().unwrap_err();
    assert!(matches!(err, FormletError::Precondition { .. }));
}

#[test]
fn test_fieldset() {
    let formlet = fieldset(
        "Person",
        &plain_input(),
        Attributes::new().with_attr("class", "person"),
        Attributes::new(),
    );
    let html = formlet.instantiate(&ns()).builder.build().unwrap();
    insta::assert_snapshot!(html.to_string(), @r#"<fieldset class="person"><legend>Person</legend><input type="text" name="field0"/></fieldset>"#);
}

#[test]
fn test_with_errors_without_errors_leaves_markup() {
    let form = Form::new(&with_errors(&text_input(None, Attributes::new())), &ns());
    let processed = form.process(submission(&[("field0", "ok")])).unwrap();
    assert_eq!(
        processed.html.to_string(),
        r#"<input type="text" name="field0" value="ok"/>"#
    );
}
