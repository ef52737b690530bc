use layers::{LayerAttachment, LayerDescriptor, LayerNode, VectorLayerNode, VectorLayerProps};
use layers::{VectorRenderMode, VectorSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scene::{LayerHandle, LayerHost, LayerKind, LayerProps, MapScene, ParentRef};

fn assert_single_parent(map: &MapScene, layers: &[LayerHandle], nodes: &[LayerAttachment]) {
    for (layer, node) in layers.iter().zip(nodes) {
        let parents = map.parents_of(layer.id());
        assert!(parents.len() <= 1, "layer {layer:?} in {parents:?}");
        assert_eq!(parents.first().copied(), node.record().map(|r| r.parent));
    }
}

#[test]
fn random_lifecycles_keep_every_layer_in_at_most_one_parent() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut map = MapScene::default();
    let groups: Vec<ParentRef> = (0..3)
        .map(|i| {
            let g = map.create_group(&format!("g{i}"), LayerProps::default());
            map.attach(ParentRef::Root, g).unwrap();
            ParentRef::Group(g.id())
        })
        .collect();
    let parents: Vec<ParentRef> = std::iter::once(ParentRef::Root).chain(groups).collect();

    let layers: Vec<LayerHandle> = (0..6)
        .map(|_| map.create_layer(LayerKind::Vector, LayerProps::default()))
        .collect();
    let mut nodes: Vec<LayerAttachment> = (0..layers.len()).map(|_| LayerAttachment::new()).collect();

    for _ in 0..500 {
        let i = rng.random_range(0..layers.len());
        let parent = parents[rng.random_range(0..parents.len())];
        let descriptor = LayerDescriptor::new(layers[i], parent);
        match rng.random_range(0..3) {
            0 => nodes[i].mount(&mut map, descriptor).unwrap(),
            1 => nodes[i].update(&mut map, descriptor).unwrap(),
            _ => nodes[i].unmount(&mut map).unwrap(),
        }
        assert_single_parent(&map, &layers, &nodes);
    }

    for node in &mut nodes {
        node.unmount(&mut map).unwrap();
    }
    for layer in &layers {
        assert!(map.parents_of(layer.id()).is_empty());
    }
}

#[test]
fn layer_moves_from_one_group_to_another() {
    let mut map = MapScene::default();
    let g1 = map.create_group("g1", LayerProps::default());
    let g2 = map.create_group("g2", LayerProps::default());
    let props = VectorLayerProps {
        source: VectorSource::new("volumes"),
        render_mode: VectorRenderMode::Vector,
        layer: LayerProps::default(),
    };

    let mut node = VectorLayerNode::new();
    let l = node
        .render(&mut map, &props, ParentRef::Group(g1.id()))
        .unwrap();
    assert_eq!(map.group_children(g1.id()).unwrap(), &[l]);

    node.render(&mut map, &props, ParentRef::Group(g2.id()))
        .unwrap();
    assert!(map.group_children(g1.id()).unwrap().is_empty());
    assert_eq!(map.group_children(g2.id()).unwrap(), &[l]);

    node.unmount(&mut map).unwrap();
    assert!(map.group_children(g2.id()).unwrap().is_empty());
}
