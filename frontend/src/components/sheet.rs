use uuid::Uuid;
use yew::{classes, html, Component, Context, Html, Properties};

/// Modal sheet sliding in from the top. Visibility follows the `open` prop so
/// the sheet can never disagree with the state that owns it.
pub struct ModalSheet {
    pub id: String,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    #[prop_or_default]
    pub children: Html,
    pub open: bool,
    #[prop_or_default]
    pub title: String,
}

impl Component for ModalSheet {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            id: format!("sheet-{}", Uuid::new_v4()),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let title_id = format!("{}-title", self.id);
        html! {
            <>
                <div class={classes!("sheet-backdrop", props.open.then_some("show"))} />
                <div
                    class={classes!("top-sheet", props.open.then_some("show"))}
                    id={self.id.clone()}
                    role="dialog"
                    aria-modal="true"
                    aria-hidden={(!props.open).to_string()}
                    aria-labelledby={title_id.clone()}
                >
                    <h3 class="sheet-title" id={title_id}>{ props.title.clone() }</h3>
                    { props.children.clone() }
                </div>
            </>
        }
    }
}
