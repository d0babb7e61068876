use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
    Ghost,
    Danger,
}

impl ButtonVariant {
    pub fn class(self) -> &'static str {
        match self {
            ButtonVariant::Primary => "button button-primary",
            ButtonVariant::Secondary => "button button-secondary",
            ButtonVariant::Outline => "button button-outline",
            ButtonVariant::Ghost => "button button-ghost",
            ButtonVariant::Danger => "button button-danger",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ButtonSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl ButtonSize {
    fn class(self) -> &'static str {
        match self {
            ButtonSize::Small => "button-sm",
            ButtonSize::Medium => "button-md",
            ButtonSize::Large => "button-lg",
        }
    }
}

pub fn button_class(variant: ButtonVariant, size: ButtonSize, loading: bool) -> String {
    let mut class = format!("{} {}", variant.class(), size.class());
    if loading {
        class.push_str(" button-loading");
    }
    class
}

#[derive(Props, PartialEq, Clone)]
pub struct ButtonProps {
    #[props(default)]
    pub variant: ButtonVariant,
    #[props(default)]
    pub size: ButtonSize,
    #[props(default = false)]
    pub disabled: bool,
    /// Disables the button and shows a spinner
    #[props(default = false)]
    pub loading: bool,
    #[props(default)]
    pub onclick: Option<EventHandler<MouseEvent>>,
    pub children: Element,
}

#[component]
pub fn Button(props: ButtonProps) -> Element {
    let onclick = props.onclick;

    rsx! {
        button {
            class: button_class(props.variant, props.size, props.loading),
            disabled: props.disabled || props.loading,
            onclick: move |event| {
                if let Some(handler) = onclick {
                    handler.call(event);
                }
            },
            if props.loading {
                span { class: "button-spinner" }
            }
            {props.children}
        }
    }
}

/// A styled link for calls to action
#[component]
pub fn LinkButton(href: String, #[props(default)] variant: ButtonVariant, children: Element) -> Element {
    rsx! {
        a {
            class: button_class(variant, ButtonSize::Large, false),
            href: href,
            {children}
        }
    }
}
