use yew::prelude::*;

use crate::model::{ClassTag, Condition, Creature};

#[derive(Properties, PartialEq, Clone)]
pub struct CollapsibleProps {
    pub name: AttrValue,
    #[prop_or_default]
    pub children: Html,
}

#[function_component]
pub fn Collapsible(props: &CollapsibleProps) -> Html {
    let collapsed = use_state(|| false);
    let toggle = {
        let collapsed = collapsed.clone();
        Callback::from(move |_| collapsed.set(!*collapsed))
    };
    let (button_text, display) = if *collapsed { ("▶", "none") } else { ("▼", "block") };
    html! {<div>
        <div style="display:flex; gap:6px; align-items:center;">
            <strong>{ props.name.clone() }</strong>
            <button onclick={toggle}>{ button_text }</button>
        </div>
        <div style={format!("display:{};", display)}>{ props.children.clone() }</div>
    </div>}
}

#[derive(Properties, PartialEq, Clone)]
pub struct TabbedViewProps {
    pub labels: Vec<AttrValue>,
    pub selected: usize,
    pub on_select: Callback<usize>,
    /// Content of the selected tab only.
    #[prop_or_default]
    pub children: Html,
}

#[function_component]
pub fn TabbedView(props: &TabbedViewProps) -> Html {
    html! {<div style="display:flex; flex-direction:column; height:100%;">
        <div style="display:flex; gap:4px; border-bottom:1px solid #30363d; padding-bottom:4px;">
            { for props.labels.iter().enumerate().map(|(i, label)| {
                let on_select = props.on_select.clone();
                let weight = if i == props.selected { "bold" } else { "normal" };
                html! { <button
                    style={format!("font-weight:{};", weight)}
                    disabled={i == props.selected}
                    onclick={Callback::from(move |_| on_select.emit(i))}
                >{ label.clone() }</button> }
            }) }
        </div>
        <div style="flex:1 1 auto; overflow:auto; padding-top:6px;">{ props.children.clone() }</div>
    </div>}
}

pub fn class_icon(class: &ClassTag) -> &'static str {
    match class {
        ClassTag::Cleric => "💉",
        ClassTag::Rogue => "🗡️",
        ClassTag::Ranger => "🏹",
        ClassTag::Creature => "🏃",
        ClassTag::Baddie => "👹",
        ClassTag::Custom(_) => "",
    }
}

pub fn condition_icon(cond: &Condition) -> String {
    match cond {
        Condition::RecurringEffect(effect) => effect.to_string(),
        Condition::Dead => "💀".to_string(),
        Condition::Incapacitated => "😞".to_string(),
        Condition::AddDamageBuff(_) => "😈".to_string(),
        Condition::DoubleMaxMovement => "🏃".to_string(),
        Condition::ActivateAbility(abid) => format!("Ability Activated: {abid}"),
    }
}

const SQUARE_STYLE: &str = "width:50px; height:50px; border-radius:10px; border:solid 1px black;";

#[derive(Properties, PartialEq, Clone)]
pub struct CreatureIconProps {
    pub creature: Creature,
    pub color: AttrValue,
}

#[function_component]
pub fn CreatureIcon(props: &CreatureIconProps) -> Html {
    if !props.creature.portrait_url.is_empty() {
        html! { <img src={props.creature.portrait_url.clone()} style={SQUARE_STYLE} /> }
    } else {
        html! { <div style={format!("background-color:{}; {}", props.color, SQUARE_STYLE)}>
            { props.creature.name.clone() }
        </div> }
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct CreatureCardProps {
    pub creature: Creature,
    pub color: AttrValue,
}

#[function_component]
pub fn CreatureCard(props: &CreatureCardProps) -> Html {
    let c = &props.creature;
    let mut conditions: Vec<(&String, String)> = c
        .conditions
        .iter()
        .map(|(id, ac)| (id, condition_icon(&ac.condition)))
        .collect();
    conditions.sort();
    html! {<div style="width:300px; border-radius:10px; border:1px solid black; padding:3px;">
        <div>
            { class_icon(&c.class) }{" "}<strong>{ c.name.clone() }</strong>
            { for conditions.into_iter().map(|(_, icon)| html!{ <span>{ icon }</span> }) }
        </div>
        <div style="display:flex; gap:8px; align-items:center;">
            <CreatureIcon creature={c.clone()} color={props.color.clone()} />
            <span style="font-size:12px;">
                { format!("HP {}/{} · Energy {}/{}", c.cur_health.0, c.max_health.0, c.cur_energy.0, c.max_energy.0) }
            </span>
        </div>
    </div>}
}
